// Toast notification enum
#[derive(Clone, Debug, PartialEq)]
pub enum Toaster {
    Success(String),
    Error(String),
    Info(String),
}

impl Toaster {
    pub fn class(&self) -> &'static str {
        match self {
            Toaster::Success(_) => "toast toast-success",
            Toaster::Error(_) => "toast toast-error",
            Toaster::Info(_) => "toast toast-info",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Toaster::Success(message) | Toaster::Error(message) | Toaster::Info(message) => {
                message
            }
        }
    }
}
