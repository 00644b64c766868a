//! HTTP surface for Rowforge: routes, handlers, templates and response
//! negotiation for the grid detail forms.

pub mod error;
pub mod handlers;
pub mod negotiate;
pub mod routes;
pub mod server;
pub mod state;
pub mod templates;

pub use error::WebError;
pub use negotiate::ResponseFormat;
pub use routes::create_router;
pub use server::WebServer;
pub use state::{ACTOR_HEADER, AppState, GridEntry};
