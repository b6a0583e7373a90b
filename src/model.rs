use {
    chrono::{DateTime, SecondsFormat, Utc},
    serde::{de, Deserialize, Deserializer, Serialize, Serializer},
    std::{fmt, str::FromStr},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attendance {
    #[default]
    #[serde(rename = "yes", alias = "accept")]
    Accept,
    #[serde(rename = "no", alias = "decline")]
    Decline,
}

impl Attendance {
    pub fn is_accept(self) -> bool {
        self == Self::Accept
    }
}

impl FromStr for Attendance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "accept" => Ok(Self::Accept),
            "no" | "decline" => Ok(Self::Decline),
            other => Err(other.to_string()),
        }
    }
}

/// The fixed dinner menu
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Meal {
    PorkTenderloin,
    GrilledSalmon,
    PortobelloMushroom,
}

impl Meal {
    pub const ALL: [Meal; 3] = [
        Meal::PorkTenderloin,
        Meal::GrilledSalmon,
        Meal::PortobelloMushroom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::PorkTenderloin => "Pork Tenderloin",
            Self::GrilledSalmon => "Grilled Salmon with Tarragon Cream",
            Self::PortobelloMushroom => "Grilled Stuffed Portobello Mushroom (vegan)",
        }
    }

    /// Short form used as the HTML input value
    pub fn slug(self) -> &'static str {
        match self {
            Self::PorkTenderloin => "pork",
            Self::GrilledSalmon => "salmon",
            Self::PortobelloMushroom => "mushroom",
        }
    }
}

impl fmt::Display for Meal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownMeal(pub String);

impl fmt::Display for UnknownMeal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" is not on the menu", self.0)
    }
}

impl std::error::Error for UnknownMeal {}

impl FromStr for Meal {
    type Err = UnknownMeal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|meal| meal.slug().eq_ignore_ascii_case(s) || meal.label() == s)
            .ok_or_else(|| UnknownMeal(s.to_string()))
    }
}

impl Serialize for Meal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Meal {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Radio inputs that were left empty arrive as `""` or not at all
fn blank_as_none(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Checkboxes post `on` (or a custom value) when ticked and nothing otherwise
fn checkbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let s = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(
        s.as_deref().map(str::trim),
        Some("on") | Some("true") | Some("yes") | Some("1")
    ))
}

/// A posted choice that matched none of the allowed values
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectedChoice {
    Attendance,
    Meal,
    PlusOneMeal,
}

/// The form exactly as posted, before choices are resolved
#[derive(Deserialize)]
struct PostedRsvp {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    phone: String,
    #[serde(default)]
    attendance: Option<String>,
    #[serde(default, deserialize_with = "checkbox")]
    plus_one_requested: bool,
    #[serde(default)]
    plus_one_name: String,
    #[serde(default)]
    dietary_restrictions: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    meal_selection: Option<String>,
    #[serde(default)]
    plus_one_meal_selection: Option<String>,
}

/// Everything a guest can fill in on the RSVP form.
///
/// Deserializing never fails on an unexpected attendance or meal value: the
/// field falls back to its default and the choice is listed in `rejected`,
/// so validation can report it next to everything else the guest typed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PostedRsvp")]
pub struct RsvpParams {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub attendance: Attendance,
    pub plus_one_requested: bool,
    pub plus_one_name: String,
    pub dietary_restrictions: String,
    pub message: String,
    pub meal_selection: Option<Meal>,
    pub plus_one_meal_selection: Option<Meal>,
    #[serde(skip)]
    pub rejected: Vec<RejectedChoice>,
}

impl From<PostedRsvp> for RsvpParams {
    fn from(posted: PostedRsvp) -> Self {
        let mut rejected = Vec::new();
        let attendance = match blank_as_none(posted.attendance) {
            None => Attendance::default(),
            Some(value) => value.parse().unwrap_or_else(|_| {
                rejected.push(RejectedChoice::Attendance);
                Attendance::default()
            }),
        };
        let mut meal = |value: Option<String>, choice: RejectedChoice| {
            blank_as_none(value).and_then(|value| match value.parse::<Meal>() {
                Ok(meal) => Some(meal),
                Err(_) => {
                    rejected.push(choice);
                    None
                }
            })
        };
        let meal_selection = meal(posted.meal_selection, RejectedChoice::Meal);
        let plus_one_meal_selection =
            meal(posted.plus_one_meal_selection, RejectedChoice::PlusOneMeal);
        Self {
            name: posted.name,
            email: posted.email,
            phone: posted.phone,
            attendance,
            plus_one_requested: posted.plus_one_requested,
            plus_one_name: posted.plus_one_name,
            dietary_restrictions: posted.dietary_restrictions,
            message: posted.message,
            meal_selection,
            plus_one_meal_selection,
            rejected,
        }
    }
}

impl RsvpParams {
    pub fn is_attending(&self) -> bool {
        self.attendance.is_accept()
    }

    pub fn has_plus_one(&self) -> bool {
        self.is_attending() && self.plus_one_requested
    }

    pub fn was_rejected(&self, choice: RejectedChoice) -> bool {
        self.rejected.contains(&choice)
    }
}

fn meal_or_empty<S: Serializer>(meal: &Option<Meal>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(meal.map(Meal::label).unwrap_or_default())
}

/// Body sent to the spreadsheet endpoint
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub attendance: Attendance,
    pub plus_one_requested: bool,
    pub plus_one_name: String,
    pub dietary_restrictions: String,
    pub message: String,
    #[serde(serialize_with = "meal_or_empty")]
    pub meal_selection: Option<Meal>,
    #[serde(serialize_with = "meal_or_empty")]
    pub plus_one_meal_selection: Option<Meal>,
    pub timestamp: String,
}

impl RsvpPayload {
    /// Build the outbound body, blanking out fields that do not apply to
    /// the chosen attendance.
    pub fn new(params: &RsvpParams, captured_at: DateTime<Utc>) -> Self {
        let attending = params.is_attending();
        let plus_one = params.has_plus_one();
        Self {
            name: params.name.trim().to_string(),
            email: params.email.trim().to_string(),
            phone: params.phone.trim().to_string(),
            attendance: params.attendance,
            plus_one_requested: plus_one,
            plus_one_name: if plus_one {
                params.plus_one_name.trim().to_string()
            } else {
                String::new()
            },
            dietary_restrictions: if attending {
                params.dietary_restrictions.trim().to_string()
            } else {
                String::new()
            },
            message: params.message.trim().to_string(),
            meal_selection: params.meal_selection.filter(|_| attending),
            plus_one_meal_selection: params.plus_one_meal_selection.filter(|_| plus_one),
            timestamp: captured_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, chrono::TimeZone};

    #[test]
    fn parse_meal() {
        assert_eq!("pork".parse::<Meal>(), Ok(Meal::PorkTenderloin));
        assert_eq!("Salmon".parse::<Meal>(), Ok(Meal::GrilledSalmon));
        assert_eq!(
            "Grilled Stuffed Portobello Mushroom (vegan)".parse::<Meal>(),
            Ok(Meal::PortobelloMushroom)
        );
        assert_eq!(
            "tofu".parse::<Meal>(),
            Err(UnknownMeal("tofu".to_string()))
        );
    }

    #[test]
    fn form_params_from_strings() {
        let params: RsvpParams = serde_json::from_value(serde_json::json!({
            "name": "John",
            "email": "john@example.com",
            "attendance": "yes",
            "plus_one_requested": "on",
            "plus_one_name": "Jane",
            "meal_selection": "salmon",
            "plus_one_meal_selection": "",
        }))
        .unwrap();
        assert!(params.plus_one_requested);
        assert_eq!(params.meal_selection, Some(Meal::GrilledSalmon));
        assert_eq!(params.plus_one_meal_selection, None);
        assert_eq!(params.phone, "");
    }

    #[test]
    fn unknown_choices_are_kept_aside() {
        let params: RsvpParams = serde_json::from_value(serde_json::json!({
            "name": "John",
            "attendance": "maybe",
            "meal_selection": "tofu",
            "plus_one_meal_selection": "salmon",
            "message": "hello there",
        }))
        .unwrap();
        assert_eq!(params.attendance, Attendance::Accept);
        assert_eq!(params.meal_selection, None);
        assert_eq!(params.plus_one_meal_selection, Some(Meal::GrilledSalmon));
        assert_eq!(params.message, "hello there");
        assert!(params.was_rejected(RejectedChoice::Attendance));
        assert!(params.was_rejected(RejectedChoice::Meal));
        assert!(!params.was_rejected(RejectedChoice::PlusOneMeal));
    }

    #[test]
    fn parse_attendance() {
        assert_eq!("Yes".parse::<Attendance>(), Ok(Attendance::Accept));
        assert_eq!("decline".parse::<Attendance>(), Ok(Attendance::Decline));
        assert!("maybe".parse::<Attendance>().is_err());
    }

    #[test]
    fn missing_checkbox_is_false() {
        let params: RsvpParams =
            serde_json::from_value(serde_json::json!({"name": "John", "attendance": "no"}))
                .unwrap();
        assert!(!params.plus_one_requested);
        assert_eq!(params.attendance, Attendance::Decline);
    }

    #[test]
    fn payload_for_decline_is_blanked() {
        let params = RsvpParams {
            name: " John ".to_string(),
            email: "john@example.com".to_string(),
            attendance: Attendance::Decline,
            plus_one_requested: true,
            plus_one_name: "Jane".to_string(),
            dietary_restrictions: "none".to_string(),
            meal_selection: Some(Meal::PorkTenderloin),
            plus_one_meal_selection: Some(Meal::GrilledSalmon),
            message: "Congrats!".to_string(),
            ..RsvpParams::default()
        };
        let captured_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
        let json = serde_json::to_value(RsvpPayload::new(&params, captured_at)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "John",
                "email": "john@example.com",
                "phone": "",
                "attendance": "no",
                "plusOneRequested": false,
                "plusOneName": "",
                "dietaryRestrictions": "",
                "message": "Congrats!",
                "mealSelection": "",
                "plusOneMealSelection": "",
                "timestamp": "2026-03-01T12:30:00.000Z",
            })
        );
    }

    #[test]
    fn payload_with_plus_one() {
        let params = RsvpParams {
            name: "John".to_string(),
            email: "john@example.com".to_string(),
            plus_one_requested: true,
            plus_one_name: "Jane".to_string(),
            meal_selection: Some(Meal::PorkTenderloin),
            plus_one_meal_selection: Some(Meal::PortobelloMushroom),
            ..RsvpParams::default()
        };
        let payload = RsvpPayload::new(&params, Utc::now());
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["attendance"], "yes");
        assert_eq!(json["plusOneName"], "Jane");
        assert_eq!(json["mealSelection"], "Pork Tenderloin");
        assert_eq!(
            json["plusOneMealSelection"],
            "Grilled Stuffed Portobello Mushroom (vegan)"
        );
    }
}
