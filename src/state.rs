use {
    crate::{
        content::SiteContent,
        endpoint::{Endpoint, StubEndpoint, Submit},
        error::Error,
    },
    tinytemplate::TinyTemplate,
};

static ERROR: &str = include_str!("../templates/error.html");
static INDEX: &str = include_str!("../templates/index.html");
static CONFIRM: &str = include_str!("../templates/confirm.html");

pub struct AppState<'a> {
    pub test: bool,
    pub submitter: Box<dyn Submit>,
    pub tt: TinyTemplate<'a>,
    pub content: SiteContent,
}

impl<'a> AppState<'a> {
    /// In test mode RSVPs are logged instead of sent
    pub fn new(endpoint: &str, content: SiteContent, test: bool) -> Result<Self, Error> {
        let submitter: Box<dyn Submit> = if test {
            Box::new(StubEndpoint)
        } else {
            Box::new(Endpoint::new(endpoint))
        };
        Ok(Self {
            test,
            submitter,
            tt: templates()?,
            content,
        })
    }

    #[cfg(test)]
    pub fn new_with_submitter<S: Submit + 'static>(submitter: S) -> Self {
        Self {
            submitter: Box::new(submitter),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl<'a> Default for AppState<'a> {
    fn default() -> Self {
        Self {
            test: true,
            submitter: Box::new(StubEndpoint),
            tt: templates().unwrap(),
            content: SiteContent::embedded().unwrap(),
        }
    }
}

fn templates<'a>() -> Result<TinyTemplate<'a>, Error> {
    let mut tt = TinyTemplate::new();
    tt.add_template("index.html", INDEX)?;
    tt.add_template("error.html", ERROR)?;
    tt.add_template("confirm.html", CONFIRM)?;
    Ok(tt)
}
