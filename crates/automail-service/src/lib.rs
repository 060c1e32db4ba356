mod blocking;
mod http;
mod traits;

pub use blocking::BlockingHttpService;
pub use http::{HttpService, DEFAULT_TIMEOUT};
pub use traits::{DocumentService, ServiceError, UploadPayload};
