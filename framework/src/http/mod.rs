mod body;
mod request;
mod response;

pub use body::{collect_body, parse_json, parse_query};
pub use request::Request;
pub use response::{HttpResponse, Response};

/// Error type for missing route parameters
#[derive(Debug)]
pub struct ParamError {
    pub param_name: String,
}

impl From<ParamError> for crate::error::FrameworkError {
    fn from(err: ParamError) -> crate::error::FrameworkError {
        crate::error::FrameworkError::bad_request(format!(
            "Missing required parameter: {}",
            err.param_name
        ))
    }
}

impl From<ParamError> for HttpResponse {
    fn from(err: ParamError) -> HttpResponse {
        HttpResponse::from(crate::error::FrameworkError::from(err))
    }
}

