//! # cubemark_extensions
//!
//! Syntax extensions for cube and card markdown.
//!
//! | Extension | Syntax | Node |
//! |---|---|---|
//! | [`Symbol`] | `{W}` | `symbol`, value also in `data.value` |
//! | [`Cardlink`] | `[[Black Lotus]]` | `cardlink` |
//! | [`Cardimage`] | `[[!Opt]]`, `[[!/Delver of Secrets]]` | `cardimage`, `id` and `dfc` props |
//! | [`Userlink`] | `@name` | `userlink` with a `name` property |
//! | [`Centering`] | `>>>` ... `<<<` lines | `centering` container |
//! | [`Cardrow`] | `{{{` ... `}}}` lines | `cardrow` container |
//! | [`Strikethrough`] | `~~gone~~` | `delete` rendered as `del` |
//!
//! Each extension owns a disjoint set of token types, so any combination
//! can be registered on one compiler.
//!
//! ## Example
//!
//! ```rust
//! use cubemark_compiler::{Compiler, CompilerConfig, MarkdownSource};
//! use cubemark_extensions::{Cardlink, Symbol};
//!
//! let mut config = CompilerConfig::new();
//! config.use_extension(&Symbol).use_extension(&Cardlink);
//! let compiler = Compiler::new(&config).unwrap();
//!
//! let source = "Cast [[Counterspell]] for {U}{U}";
//! let events = MarkdownSource::new(&config).events(source).unwrap();
//! let root = compiler.compile(source, events).unwrap();
//!
//! assert_eq!(root.find_all("symbol").len(), 2);
//! assert_eq!(root.find_all("cardlink")[0].value, "Counterspell");
//! ```

mod capture;
mod cardimage;
mod cardlink;
mod cardrow;
mod centering;
mod settings;
mod strikethrough;
mod symbol;
mod userlink;

pub use cardimage::{CARDIMAGE, CARDIMAGE_VALUE, Cardimage};
pub use cardlink::{CARDLINK, CARDLINK_VALUE, Cardlink};
pub use cardrow::{CARDROW, Cardrow};
pub use centering::{CENTERING, Centering};
pub use settings::{
    BUILTIN_EXTENSIONS, ExtensionDefinition, ExtensionDefinitionDetail, ExtensionSettings,
};
pub use strikethrough::{STRIKETHROUGH, Strikethrough};
pub use symbol::{SYMBOL, SYMBOL_VALUE, Symbol};
pub use userlink::{USERLINK, USERLINK_VALUE, Userlink};
