mod email_capture;
mod health_check;

pub use email_capture::*;
pub use health_check::*;
