use {
    crate::{
        endpoint::{Ack, Submit, TransportError},
        model::{RejectedChoice, RsvpParams, RsvpPayload},
    },
    chrono::{DateTime, Utc},
    derive_more::Display,
    log::{error, info},
};

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum ValidationError {
    #[display(fmt = "Please enter your full name")]
    MissingName,
    #[display(fmt = "Please enter your email address")]
    MissingEmail,
    #[display(fmt = "Please enter a valid email address")]
    InvalidEmail,
    #[display(fmt = "Please let us know whether you can attend")]
    InvalidAttendance,
    #[display(fmt = "Please choose a meal")]
    MissingMeal,
    #[display(fmt = "Please choose a meal from the menu")]
    UnknownMeal,
    #[display(fmt = "Please enter your plus-one's name")]
    MissingPlusOneName,
    #[display(fmt = "Please choose a meal for your plus-one")]
    MissingPlusOneMeal,
    #[display(fmt = "Please choose a meal from the menu for your plus-one")]
    UnknownPlusOneMeal,
}

impl ValidationError {
    /// Name of the form field at fault
    pub fn field(self) -> &'static str {
        match self {
            Self::MissingName => "name",
            Self::MissingEmail | Self::InvalidEmail => "email",
            Self::InvalidAttendance => "attendance",
            Self::MissingMeal | Self::UnknownMeal => "meal_selection",
            Self::MissingPlusOneName => "plus_one_name",
            Self::MissingPlusOneMeal | Self::UnknownPlusOneMeal => "plus_one_meal_selection",
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check required fields, in the order they appear on the form
pub fn validate(params: &RsvpParams) -> Result<(), ValidationError> {
    if params.name.trim().is_empty() {
        return Err(ValidationError::MissingName);
    }
    let email = params.email.trim();
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail);
    }
    if params.was_rejected(RejectedChoice::Attendance) {
        return Err(ValidationError::InvalidAttendance);
    }
    if params.is_attending() {
        if params.was_rejected(RejectedChoice::Meal) {
            return Err(ValidationError::UnknownMeal);
        }
        if params.meal_selection.is_none() {
            return Err(ValidationError::MissingMeal);
        }
        if params.plus_one_requested {
            if params.plus_one_name.trim().is_empty() {
                return Err(ValidationError::MissingPlusOneName);
            }
            if params.was_rejected(RejectedChoice::PlusOneMeal) {
                return Err(ValidationError::UnknownPlusOneMeal);
            }
            if params.plus_one_meal_selection.is_none() {
                return Err(ValidationError::MissingPlusOneMeal);
            }
        }
    }
    Ok(())
}

#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum SubmitError {
    #[display(fmt = "{}", _0)]
    Validation(ValidationError),
    #[display(fmt = "{}", _0)]
    Transport(TransportError),
    #[display(fmt = "This RSVP is already being sent")]
    InProgress,
    #[display(fmt = "This RSVP has already been received")]
    AlreadyConfirmed,
    #[display(fmt = "This RSVP has not been sent yet")]
    NotSubmitting,
}

impl From<ValidationError> for SubmitError {
    fn from(error: ValidationError) -> Self {
        Self::Validation(error)
    }
}

impl From<TransportError> for SubmitError {
    fn from(error: TransportError) -> Self {
        Self::Transport(error)
    }
}

impl std::error::Error for SubmitError {}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Editing,
    Submitting,
    Confirmed,
}

/// One guest's trip through the RSVP form.
///
/// Starts out editing. A submit validates, moves to `Submitting` for the
/// single outbound request, then lands on `Confirmed` or back on `Editing`
/// with the error kept alongside the untouched form values.
///
/// The web handlers build one flow per request from the posted form, so
/// each POST is a single submit attempt and "submit another" is just a
/// fresh form. `update` and `submit_another` are for callers that keep a
/// flow alive across several edits.
#[derive(Debug)]
pub struct RsvpFlow {
    form: RsvpParams,
    phase: Phase,
    error: Option<SubmitError>,
}

impl Default for RsvpFlow {
    fn default() -> Self {
        Self::new(RsvpParams::default())
    }
}

impl RsvpFlow {
    pub fn new(form: RsvpParams) -> Self {
        Self {
            form,
            phase: Phase::Editing,
            error: None,
        }
    }

    pub fn form(&self) -> &RsvpParams {
        &self.form
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error(&self) -> Option<&SubmitError> {
        self.error.as_ref()
    }

    pub fn is_confirmed(&self) -> bool {
        self.phase == Phase::Confirmed
    }

    /// Change the form, only possible while editing
    pub fn update<F: FnOnce(&mut RsvpParams)>(&mut self, f: F) -> Result<(), SubmitError> {
        match self.phase {
            Phase::Editing => {
                f(&mut self.form);
                Ok(())
            }
            Phase::Submitting => Err(SubmitError::InProgress),
            Phase::Confirmed => Err(SubmitError::AlreadyConfirmed),
        }
    }

    /// Validate and move to `Submitting`, returning the body to send
    pub fn begin_submit(&mut self, now: DateTime<Utc>) -> Result<RsvpPayload, SubmitError> {
        match self.phase {
            Phase::Editing => {}
            Phase::Submitting => return Err(SubmitError::InProgress),
            Phase::Confirmed => return Err(SubmitError::AlreadyConfirmed),
        }
        if let Err(error) = validate(&self.form) {
            self.error = Some(error.into());
            return Err(error.into());
        }
        self.error = None;
        self.phase = Phase::Submitting;
        Ok(RsvpPayload::new(&self.form, now))
    }

    /// Record the outcome of the request started by `begin_submit`
    pub fn finish_submit(&mut self, outcome: Result<Ack, TransportError>) -> Result<(), SubmitError> {
        match self.phase {
            Phase::Submitting => {}
            Phase::Editing => return Err(SubmitError::NotSubmitting),
            Phase::Confirmed => return Err(SubmitError::AlreadyConfirmed),
        }
        match outcome {
            Ok(Ack) => {
                self.phase = Phase::Confirmed;
                Ok(())
            }
            Err(error) => {
                self.phase = Phase::Editing;
                self.error = Some(error.clone().into());
                Err(error.into())
            }
        }
    }

    /// Send the form once. No retries; a failure leaves the form as it was.
    pub async fn submit<S: Submit + ?Sized>(
        &mut self,
        submitter: &S,
        now: DateTime<Utc>,
    ) -> Result<(), SubmitError> {
        let payload = self.begin_submit(now)?;
        let outcome = submitter.submit(&payload).await;
        match &outcome {
            Ok(_) => info!("RSVP sent for {}", payload.name),
            Err(error) => error!("Could not send RSVP for {}: {}", payload.name, error),
        }
        self.finish_submit(outcome)
    }

    /// Start a fresh form after a confirmed RSVP
    pub fn submit_another(&mut self) {
        if self.is_confirmed() {
            *self = Self::default();
        }
    }
}
