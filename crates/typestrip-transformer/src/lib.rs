//! TypeScript to JavaScript type stripping.
//!
//! This crate turns typed `.ts`/`.tsx` source into plain `.js`/`.jsx` by
//! deleting the byte ranges that only the type checker cares about. The
//! input is parsed with `swc`, but nothing is reprinted, so every character
//! outside a removed range comes out exactly as it went in. It handles:
//! - Type-only imports and exports, including mixed specifier lists
//! - Interfaces, type aliases, ambient declarations and overloads
//! - Inline annotations, generics, assertions and class member modifiers
//! - Rewriting relative module specifiers to the untyped extensions
//!
//! # Example
//!
//! ```
//! use typestrip_transformer::{transform, TransformOptions};
//!
//! let source = r#"
//! interface GreetingProps {
//!     name: string;
//! }
//!
//! const Greeting = ({ name }: GreetingProps) => <div>{name}</div>;
//! export default Greeting;
//! "#;
//!
//! let result = transform(source, &TransformOptions::default());
//! assert!(result.code.contains("({ name }) =>"));
//! assert!(!result.code.contains("interface"));
//! ```

mod diagnostic;
mod fallback;
mod imports;
mod lexer;
mod normalize;
mod options;
mod specifier;
mod strip;
mod transform;

pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use options::{ExtensionMap, SourceKind, TransformOptions};
pub use specifier::is_relative_specifier;
pub use transform::{transform, TransformResult};
