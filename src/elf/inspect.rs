//! ELF inspection built on the `object` crate's low-level ELF reader
//!
//! The low-level API is used instead of the unified `object::File` so
//! that symbol type and binding come through as the raw ST_TYPE/ST_BIND
//! values rather than object's lossy remapping.

use std::fs;
use std::path::Path;

use object::elf;
use object::elf::FileHeader32;
use object::elf::FileHeader64;
use object::read::elf::Dyn;
use object::read::elf::FileHeader;
use object::read::elf::Sym;
use object::Endianness;

use crate::error::ElfError;

use super::types::Architecture;
use super::types::DynSymbol;
use super::types::ElfSummary;
use super::types::SymbolKind;

/// Read and summarise the ELF file at `path`.
pub fn inspect(path: &Path) -> Result<ElfSummary, ElfError> {
    let data = fs::read(path)?;
    summarize(&data)
}

/// Summarise an in-memory ELF image.
pub fn summarize(data: &[u8]) -> Result<ElfSummary, ElfError> {
    const EI_CLASS: usize = 4;
    match data.get(EI_CLASS).copied() {
        Some(elf::ELFCLASS32) => parse_class::<FileHeader32<Endianness>>(data, elf::ELFCLASS32),
        Some(elf::ELFCLASS64) => parse_class::<FileHeader64<Endianness>>(data, elf::ELFCLASS64),
        other => Err(ElfError::UnsupportedClass(other.unwrap_or(0))),
    }
}

fn parse_class<Elf: FileHeader<Endian = Endianness>>(
    data: &[u8],
    class: u8,
) -> Result<ElfSummary, ElfError> {
    let header = Elf::parse(data)?;
    let endian = header.endian()?;
    let sections = header.sections(endian, data)?;

    let mut needed = Vec::new();
    let mut runpath = None;
    let mut rpath = None;

    if let Some((entries, link)) = sections.dynamic(endian, data)? {
        let strings = sections.strings(endian, data, link)?;
        for entry in entries {
            let Some(tag) = entry.tag32(endian) else {
                continue;
            };
            match tag {
                elf::DT_NEEDED => {
                    if let Ok(name) = entry.string(endian, strings) {
                        needed.push(String::from_utf8_lossy(name).into_owned());
                    }
                }
                elf::DT_RUNPATH => {
                    if let Ok(value) = entry.string(endian, strings) {
                        runpath = Some(String::from_utf8_lossy(value).into_owned());
                    }
                }
                elf::DT_RPATH => {
                    if let Ok(value) = entry.string(endian, strings) {
                        rpath = Some(String::from_utf8_lossy(value).into_owned());
                    }
                }
                _ => {}
            }
        }
    }

    // A stripped library without a dynamic symbol section still
    // contributes its DT_NEEDED edges to the topology.
    let symtab = sections.symbols(endian, data, elf::SHT_DYNSYM)?;
    let strings = symtab.strings();
    let mut symbols = Vec::new();
    for sym in symtab.iter() {
        let name = match sym.name(endian, strings) {
            Ok(name) if !name.is_empty() => String::from_utf8_lossy(name).into_owned(),
            _ => continue,
        };
        let kind = match sym.st_type() {
            elf::STT_FUNC => SymbolKind::Func,
            elf::STT_OBJECT => SymbolKind::Object,
            _ => SymbolKind::Other,
        };
        symbols.push(DynSymbol {
            name,
            kind,
            weak: sym.st_bind() == elf::STB_WEAK,
            defined: sym.st_shndx(endian) != elf::SHN_UNDEF,
        });
    }

    Ok(ElfSummary {
        symbols,
        needed,
        // DT_RUNPATH is the newer tag and wins when both are present
        runpath: runpath.or(rpath),
        arch: Architecture {
            machine: header.e_machine(endian),
            class,
        },
    })
}
