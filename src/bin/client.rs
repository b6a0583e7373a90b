use {
    awc::Client,
    clap::Parser,
    wedding_site::model::{Attendance, Meal, RsvpParams},
};

/// Client for sending an RSVP to a running site
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// URL hosting the site
    #[arg(short, long, default_value_t = String::from("http://127.0.0.1:8080"))]
    url: String,

    /// Guest's full name
    #[arg()]
    name: String,

    /// Guest's email address
    #[arg()]
    email: String,

    /// Guest's phone number
    #[arg(long, default_value_t = String::new())]
    phone: String,

    /// Send a regretful decline instead of an acceptance
    #[arg(long)]
    decline: bool,

    /// Meal choice: pork, salmon or mushroom
    #[arg(short, long)]
    meal: Option<Meal>,

    /// Plus-one's name, requests a plus-one when given
    #[arg(long)]
    plus_one: Option<String>,

    /// Plus-one's meal choice
    #[arg(long)]
    plus_one_meal: Option<Meal>,

    /// Dietary restrictions
    #[arg(long, default_value_t = String::new())]
    dietary: String,

    /// Message to the couple
    #[arg(long, default_value_t = String::new())]
    message: String,
}

#[actix_web::main]
async fn main() {
    let matches = Args::parse();
    let client = Client::default();

    // Create rsvp params
    let params = RsvpParams {
        name: matches.name,
        email: matches.email,
        phone: matches.phone,
        attendance: if matches.decline {
            Attendance::Decline
        } else {
            Attendance::Accept
        },
        plus_one_requested: matches.plus_one.is_some(),
        plus_one_name: matches.plus_one.unwrap_or_default(),
        dietary_restrictions: matches.dietary,
        message: matches.message,
        meal_selection: matches.meal,
        plus_one_meal_selection: matches.plus_one_meal,
        ..RsvpParams::default()
    };

    // Create request builder and send request
    let response = client
        .post(format!("{}/rsvp", matches.url))
        .send_form(&params)
        .await;

    match response {
        Ok(response) => println!("Response: {}", response.status()),
        Err(error) => eprintln!("Could not send RSVP: {}", error),
    }
}
