pub mod bom;
pub mod content;
pub mod dictionary;
pub mod document;
pub mod feature;
pub mod metadata;
pub mod net;
pub mod package;
pub mod padstack;
pub mod stackup;

pub use bom::*;
pub use content::*;
pub use dictionary::*;
pub use document::*;
pub use feature::*;
pub use metadata::*;
pub use net::*;
pub use package::*;
pub use padstack::*;
pub use stackup::*;
