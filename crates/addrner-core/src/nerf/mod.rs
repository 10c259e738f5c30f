//! # nerf Annotation Format
//!
//! nerf is a JSON schema for hand-editable NER annotations:
//!
//! ```json
//! [
//!   {
//!     "text": "431 Marietta St NW Fl. 3",
//!     "ents": [
//!       { "text": "431", "label": "AddressNumber" },
//!       { "text": "Marietta", "label": "StreetName" },
//!       { "text": "3", "label": "OccupancyIdentifier", "start": 23, "end": 24 }
//!     ]
//!   }
//! ]
//! ```
//!
//! An entity whose text occurs once in its document is located by the text
//! alone; repeated text carries character offsets.

pub mod codec;
pub mod docspec;
pub mod entity;

pub use codec::{
    Format, convert_format, docbin_to_docspecs, docbin_to_nerf, docspecs_to_docbin,
    nerf_to_docbin, parse_nerf, read_nerf, write_nerf,
};
pub use docspec::DocSpec;
pub use entity::EntSpec;
