//! Sheet file storage.
//!
//! `.grd` files hold one cell per line as `CELLREF: input`.

mod parser;
mod writer;

pub use parser::{MAX_SHEET_FILE_BYTES, parse_grd, parse_grd_content};
pub use writer::{write_grd, write_grd_content};
