//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup / reload):
//!     (method, "/users/:id", handler)*
//!     → template.rs (parse & validate)
//!     → registry.rs (insert into segment tree, detect conflicts)
//!     → tree.rs (freeze as immutable RouteTree)
//!     → table.rs (atomic publish)
//!
//! Incoming Request (method, path)
//!     → path.rs (split, decode, normalize)
//!     → matcher.rs (backtracking walk: static > param > wildcard)
//!     → Return: RouteMatch or NotFound / MethodNotAllowed
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex and no route scanning: cost follows path depth only
//! - Deterministic: registration order never changes the outcome

pub mod error;
pub mod matcher;
pub mod options;
pub mod params;
mod path;
pub mod registry;
pub mod table;
pub mod template;
pub mod tree;

pub use error::{MatchError, RouteError};
pub use options::RouterOptions;
pub use params::{ParamError, Params, RouteMatch};
pub use registry::RouteRegistry;
pub use table::RouteTable;
pub use template::{PathTemplate, Segment, TemplateError};
pub use tree::{RouteInfo, RouteTree};
