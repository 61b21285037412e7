//! Server-rendered website: page table, HTML, and the router that hosts the forms.

mod page;
pub mod render;
mod router;

pub use page::Page;
pub use router::{site_router, MAX_UPLOAD_BYTES};
