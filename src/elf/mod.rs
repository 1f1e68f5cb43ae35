//! ELF file inspection for symbol resolution

mod inspect;
mod types;

pub use inspect::inspect;
pub use inspect::summarize;
pub use types::Architecture;
pub use types::DynSymbol;
pub use types::ElfSummary;
pub use types::SymbolKind;
