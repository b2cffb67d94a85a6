mod auth;
mod certificates;

pub use auth::*;
pub use certificates::*;

pub async fn index() -> &'static str {
    "Hello from the Veridia certificates backend!"
}
