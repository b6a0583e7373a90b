pub mod content;
pub mod countdown;
pub mod endpoint;
pub mod error;
pub mod model;
pub mod routes;
pub mod rsvp;
pub mod state;
