//! `typeprocess` - Create SharePoint list items from form values
//!
//! This library posts form field values to a SharePoint list through the
//! `AddValidateUpdateItemUsingPath` REST endpoint and renders the welcome
//! panel that fronts the form.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod localization;
pub mod logging;
pub mod model;
pub mod service;
pub mod transport;

pub use config::Config;
pub use error::{Error, ErrorKind, Result, SubmitError};
pub use form::{render_form, write_form, FormProps, FormStyles};
pub use localization::{Localizer, StringTable};
pub use logging::init_logging;
pub use model::{FormValue, ListItemFormUpdateValue, SubmissionData};
pub use service::{ItemSubmitter, TypeProcessService};
pub use transport::{HttpTransport, ReqwestTransport};
