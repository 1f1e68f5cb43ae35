//! Synthetic ELF fixtures for integration tests.
//!
//! Builds minimal little-endian shared objects from raw bytes: ELF
//! header plus .dynsym/.dynstr/.dynamic/.shstrtab sections. That is
//! exactly the surface the inspector reads, so no toolchain or binary
//! fixtures are needed, and both classes and any machine value can be
//! produced on demand.

use std::fs;
use std::path::Path;

pub const EM_386: u16 = 3;
pub const EM_X86_64: u16 = 62;
pub const EM_AARCH64: u16 = 183;

const ET_DYN: u16 = 3;
const SHT_STRTAB: u32 = 3;
const SHT_DYNAMIC: u32 = 6;
const SHT_DYNSYM: u32 = 11;
const SHF_ALLOC: u64 = 2;

const DT_NULL: u64 = 0;
const DT_NEEDED: u64 = 1;
const DT_RPATH: u64 = 15;
const DT_RUNPATH: u64 = 29;

const STT_OBJECT: u8 = 1;
const STT_FUNC: u8 = 2;
const STB_GLOBAL: u8 = 1;
const STB_WEAK: u8 = 2;

// offsets into the section-name string table written by `build`
const SHSTRTAB: &[u8] = b"\0.dynsym\0.dynstr\0.dynamic\0.shstrtab\0";
const NAME_DYNSYM: u32 = 1;
const NAME_DYNSTR: u32 = 9;
const NAME_DYNAMIC: u32 = 17;
const NAME_SHSTRTAB: u32 = 26;

/// Builder for a minimal dynamic ELF image.
pub struct TestElf {
    class64: bool,
    machine: u16,
    needed: Vec<String>,
    runpath: Option<String>,
    rpath: Option<String>,
    strip_dynsym: bool,
    // (name, st_type, st_bind, defined)
    symbols: Vec<(String, u8, u8, bool)>,
}

impl TestElf {
    pub fn new64(machine: u16) -> Self {
        Self {
            class64: true,
            machine,
            needed: Vec::new(),
            runpath: None,
            rpath: None,
            strip_dynsym: false,
            symbols: Vec::new(),
        }
    }

    pub fn new32(machine: u16) -> Self {
        Self {
            class64: false,
            ..Self::new64(machine)
        }
    }

    pub fn needed(mut self, soname: &str) -> Self {
        self.needed.push(soname.to_string());
        self
    }

    pub fn runpath(mut self, runpath: &str) -> Self {
        self.runpath = Some(runpath.to_string());
        self
    }

    pub fn rpath(mut self, rpath: &str) -> Self {
        self.rpath = Some(rpath.to_string());
        self
    }

    pub fn func(mut self, name: &str, defined: bool) -> Self {
        self.symbols
            .push((name.to_string(), STT_FUNC, STB_GLOBAL, defined));
        self
    }

    pub fn weak_func(mut self, name: &str, defined: bool) -> Self {
        self.symbols
            .push((name.to_string(), STT_FUNC, STB_WEAK, defined));
        self
    }

    pub fn object(mut self, name: &str, defined: bool) -> Self {
        self.symbols
            .push((name.to_string(), STT_OBJECT, STB_GLOBAL, defined));
        self
    }

    pub fn other_sym(mut self, name: &str, defined: bool) -> Self {
        self.symbols.push((name.to_string(), 0, STB_GLOBAL, defined));
        self
    }

    /// Omit the .dynsym section entirely, like a stripped library that
    /// still declares its DT_NEEDED dependencies.
    pub fn stripped(mut self) -> Self {
        self.strip_dynsym = true;
        self
    }

    pub fn write(&self, path: &Path) {
        fs::write(path, self.build()).unwrap();
    }

    pub fn build(&self) -> Vec<u8> {
        let (ehsize, shentsize, symsize, dynentsize) = if self.class64 {
            (64usize, 64u16, 24usize, 16usize)
        } else {
            (52, 40, 16, 8)
        };

        let mut dynstr = vec![0u8];

        // (name offset, st_info, st_shndx); index 0 is the null symbol
        let mut syms = vec![(0u32, 0u8, 0u16)];
        for (name, st_type, st_bind, defined) in &self.symbols {
            let name_off = add_str(&mut dynstr, name);
            let shndx = if *defined { 1 } else { 0 };
            syms.push((name_off, (st_bind << 4) | st_type, shndx));
        }

        let mut dyns: Vec<(u64, u64)> = Vec::new();
        for soname in &self.needed {
            let off = add_str(&mut dynstr, soname);
            dyns.push((DT_NEEDED, u64::from(off)));
        }
        if let Some(runpath) = &self.runpath {
            let off = add_str(&mut dynstr, runpath);
            dyns.push((DT_RUNPATH, u64::from(off)));
        }
        if let Some(rpath) = &self.rpath {
            let off = add_str(&mut dynstr, rpath);
            dyns.push((DT_RPATH, u64::from(off)));
        }
        dyns.push((DT_NULL, 0));

        // without .dynsym the remaining sections shift down one index
        let has_dynsym = !self.strip_dynsym;
        let dynstr_index: u32 = if has_dynsym { 2 } else { 1 };
        let shnum: u16 = if has_dynsym { 5 } else { 4 };

        let off_dynsym = align8(ehsize);
        let off_dynstr = if has_dynsym {
            off_dynsym + syms.len() * symsize
        } else {
            off_dynsym
        };
        let off_dynamic = align8(off_dynstr + dynstr.len());
        let off_shstrtab = off_dynamic + dyns.len() * dynentsize;
        let shoff = align8(off_shstrtab + SHSTRTAB.len());

        let mut buf = Vec::new();

        // ELF header
        buf.extend_from_slice(&[0x7f, b'E', b'L', b'F']);
        buf.push(if self.class64 { 2 } else { 1 });
        buf.push(1); // little-endian
        buf.push(1); // EV_CURRENT
        buf.extend_from_slice(&[0u8; 9]);
        p16(&mut buf, ET_DYN);
        p16(&mut buf, self.machine);
        p32(&mut buf, 1);
        if self.class64 {
            p64(&mut buf, 0); // e_entry
            p64(&mut buf, 0); // e_phoff
            p64(&mut buf, shoff as u64);
        } else {
            p32(&mut buf, 0);
            p32(&mut buf, 0);
            p32(&mut buf, shoff as u32);
        }
        p32(&mut buf, 0); // e_flags
        p16(&mut buf, ehsize as u16);
        p16(&mut buf, 0); // e_phentsize
        p16(&mut buf, 0); // e_phnum
        p16(&mut buf, shentsize);
        p16(&mut buf, shnum); // e_shnum
        p16(&mut buf, shnum - 1); // e_shstrndx

        pad_to(&mut buf, off_dynsym);
        if has_dynsym {
            for (name, info, shndx) in &syms {
                if self.class64 {
                    p32(&mut buf, *name);
                    buf.push(*info);
                    buf.push(0);
                    p16(&mut buf, *shndx);
                    p64(&mut buf, 0); // st_value
                    p64(&mut buf, 0); // st_size
                } else {
                    p32(&mut buf, *name);
                    p32(&mut buf, 0);
                    p32(&mut buf, 0);
                    buf.push(*info);
                    buf.push(0);
                    p16(&mut buf, *shndx);
                }
            }
        }

        buf.extend_from_slice(&dynstr);

        pad_to(&mut buf, off_dynamic);
        for (tag, val) in &dyns {
            if self.class64 {
                p64(&mut buf, *tag);
                p64(&mut buf, *val);
            } else {
                p32(&mut buf, *tag as u32);
                p32(&mut buf, *val as u32);
            }
        }

        buf.extend_from_slice(SHSTRTAB);

        pad_to(&mut buf, shoff);
        let sh_align = if self.class64 { 8 } else { 4 };
        // section 0: SHN_UNDEF
        self.shdr(&mut buf, 0, 0, 0, 0, 0, 0, 0, 0, 0);
        if has_dynsym {
            self.shdr(
                &mut buf,
                NAME_DYNSYM,
                SHT_DYNSYM,
                SHF_ALLOC,
                off_dynsym as u64,
                (syms.len() * symsize) as u64,
                dynstr_index, // linked string table: .dynstr
                1,            // one local symbol: the null entry
                sh_align,
                symsize as u64,
            );
        }
        self.shdr(
            &mut buf,
            NAME_DYNSTR,
            SHT_STRTAB,
            SHF_ALLOC,
            off_dynstr as u64,
            dynstr.len() as u64,
            0,
            0,
            1,
            0,
        );
        self.shdr(
            &mut buf,
            NAME_DYNAMIC,
            SHT_DYNAMIC,
            SHF_ALLOC,
            off_dynamic as u64,
            (dyns.len() * dynentsize) as u64,
            dynstr_index,
            0,
            sh_align,
            dynentsize as u64,
        );
        self.shdr(
            &mut buf,
            NAME_SHSTRTAB,
            SHT_STRTAB,
            0,
            off_shstrtab as u64,
            SHSTRTAB.len() as u64,
            0,
            0,
            1,
            0,
        );

        buf
    }

    #[allow(clippy::too_many_arguments)]
    fn shdr(
        &self,
        buf: &mut Vec<u8>,
        name: u32,
        sh_type: u32,
        flags: u64,
        offset: u64,
        size: u64,
        link: u32,
        info: u32,
        addralign: u64,
        entsize: u64,
    ) {
        p32(buf, name);
        p32(buf, sh_type);
        if self.class64 {
            p64(buf, flags);
            p64(buf, 0); // sh_addr
            p64(buf, offset);
            p64(buf, size);
            p32(buf, link);
            p32(buf, info);
            p64(buf, addralign);
            p64(buf, entsize);
        } else {
            p32(buf, flags as u32);
            p32(buf, 0);
            p32(buf, offset as u32);
            p32(buf, size as u32);
            p32(buf, link);
            p32(buf, info);
            p32(buf, addralign as u32);
            p32(buf, entsize as u32);
        }
    }
}

fn add_str(strtab: &mut Vec<u8>, s: &str) -> u32 {
    let off = strtab.len() as u32;
    strtab.extend_from_slice(s.as_bytes());
    strtab.push(0);
    off
}

fn align8(n: usize) -> usize {
    (n + 7) & !7
}

fn pad_to(buf: &mut Vec<u8>, offset: usize) {
    assert!(buf.len() <= offset);
    buf.resize(offset, 0);
}

fn p16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn p32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn p64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}
