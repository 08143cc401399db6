//! Parsers for sensitivity data files and reference integral-index output.
//!
//! # Example
//!
//! ```
//! use sensim_parser::{parse_sdf, region_integrated};
//!
//! let doc = parse_sdf("\
//! example
//!     1    number of neutron groups
//!   energy boundaries:
//!  2.000000E+07 1.000000E-05
//! u-235        fission            92235    18
//!          0         0
//!  0.000000E+00 0.000000E+00         0         0
//!  1.000000E-01 1.000000E-03 1.000000E-01 0.000000E+00 0.000000E+00
//!  1.000000E-01 1.000000E-03
//! ").unwrap();
//!
//! assert_eq!(doc.num_groups(), 1);
//! assert_eq!(region_integrated(&doc).len(), 1);
//! ```

pub mod error;
pub mod integral;
pub mod names;
pub mod region;
pub mod scan;
pub mod sdf;

pub use error::{Error, Result};
pub use integral::{parse_integral_output, parse_integral_output_named, read_integral_output};
pub use names::{sanitize_sdf_file, sanitize_title};
pub use region::{
    read_region_integrated, region_integrated, region_integrated_document, to_nested_map,
    to_nested_map_by,
};
pub use sdf::{parse_sdf, parse_sdf_named, read_sdf, render_sdf};
