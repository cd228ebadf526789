mod request;
mod response;

pub use request::IndexRequestBody;
pub use response::{HealthResponse, IndexResponse};
