//! A permissive, streaming tokenizer for a generalized markup language
//! covering HTML, XML, and a family of embedded-code dialects (SGML
//! declarations, CDATA, processing instructions, ASP/JSP/PHP-style
//! `<% %>`, T4 `<# #>`).
//!
//! Given a character stream, [`tokenize`] emits a flat [`Token`] sequence
//! describing element begins/ends/voids, attributes with primitive values,
//! character data, and opaque "unparsed" regions (comments, CDATA, code
//! blocks, PIs). Recovery is HTML-style: this tokenizer never rejects input
//! that merely violates strict XML, recovering instead by emitting literal
//! text, auto-balancing tags, and tolerating malformed markers.
//!
//! Out of scope: full HTML5 tree construction, script execution, an entity
//! set beyond the enumerated named references, DTD/schema validation, and
//! character-encoding detection (input is already decoded characters).
//!
//! ```
//! use markup_tokenizer::{tokenize, StrTextStream, Token, TokenizerConfig};
//!
//! let mut stream = StrTextStream::new("<a href=/foo>x</a>");
//! let tokens = tokenize(&mut stream, &TokenizerConfig::default())
//!     .expect("tokenize should succeed");
//! assert!(matches!(tokens[0], Token::ElementBegin(_)));
//! ```

pub mod char_class;
pub mod entities;
pub mod error;
pub mod qname;
pub mod scope;
pub mod stream;
pub mod token;
pub mod tokenizer;

pub use error::{DeserializationError, Position};
pub use qname::{DataName, QName};
pub use scope::{Scope, ScopeChain};
pub use stream::{ReaderTextStream, StrTextStream, TextStream};
pub use token::{Primitive, Token, Unparsed};
pub use tokenizer::{tokenize, Tokenizer, TokenizerConfig, TokenizerStats};
