mod request;
mod select;

pub use request::CatchmentRequestPage;
