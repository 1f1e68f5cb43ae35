//! Summary records extracted from an ELF file

/// Classification of a dynamic symbol, collapsed to the categories the
/// report distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Func,
    Object,
    Other,
}

/// One dynamic-symbol-table entry.
#[derive(Debug, Clone)]
pub struct DynSymbol {
    pub name: String,
    pub kind: SymbolKind,
    /// STB_WEAK binding.
    pub weak: bool,
    /// Defined within this file (`st_shndx != SHN_UNDEF`).
    pub defined: bool,
}

/// Machine/class pair used to keep mixed-architecture directories from
/// cross-contaminating resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Architecture {
    /// `e_machine` value.
    pub machine: u16,
    /// `EI_CLASS` value (32- or 64-bit).
    pub class: u8,
}

/// Everything the resolver needs to know about one ELF file.
#[derive(Debug, Clone)]
pub struct ElfSummary {
    /// Dynamic symbols in table order.
    pub symbols: Vec<DynSymbol>,
    /// DT_NEEDED entries in table order.
    pub needed: Vec<String>,
    /// Raw DT_RUNPATH (DT_RPATH fallback): colon-separated, `$ORIGIN`
    /// not yet substituted.
    pub runpath: Option<String>,
    pub arch: Architecture,
}
