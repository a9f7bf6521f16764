//! Structure input: file-list handling, format detection, chain loading
//!
//! Parsing policies (`--ter`, `--split`, `--het`, `--atom`, `--chain`,
//! `--model`) are line-level PDB semantics, so both parsers are hand-rolled
//! and share [`ParseOptions`].

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use super::cif::parse_cif;
use super::pdb::parse_pdb;
use super::{residue_code, residue_vote, ChainData, ChainRecord};
use crate::align::secstr;

/// Parsing policy shared by the PDB and mmCIF readers.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Chain termination: 3 = TER/ENDMDL/END/chain change, 2 = ENDMDL/END/
    /// chain change, 1 = ENDMDL/END, 0 = end of file.
    pub ter: i32,
    /// Splitting: 0 = whole parse is one chain, 1 = one chain per MODEL,
    /// 2 = one chain per chain ID.
    pub split: i32,
    /// Include HETATM records.
    pub het: bool,
    /// Representative atom name, or "auto" (Cα for amino acids, C3' for
    /// nucleotides).
    pub atom: String,
    /// Restrict to these chain IDs (`_` = blank ID). Empty = no restriction.
    pub chains: Vec<String>,
    /// Restrict to these model numbers. Empty = no restriction.
    pub models: Vec<String>,
}

impl ParseOptions {
    /// Does an atom record name a chain's representative atom?
    pub fn atom_matches(&self, atom_name: &str, comp: &str) -> bool {
        let name = atom_name.trim();
        if self.atom == "auto" {
            if residue_vote(comp) > 0 {
                name == "C3'"
            } else {
                name == "CA"
            }
        } else {
            name == self.atom.trim()
        }
    }
}

/// One residue as it comes off a parser: coordinates plus component name.
#[derive(Debug, Clone)]
pub struct RawResidue {
    pub xyz: [f64; 3],
    pub comp: String,
}

/// One chain as it comes off a parser. `suffix` is the split discriminator
/// appended to the file label (`""`, `":<model>"` or `":<chainID>"`).
#[derive(Debug, Clone)]
pub struct RawChain {
    pub suffix: String,
    pub residues: Vec<RawResidue>,
}

/// How to override the auto-detected molecule type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MolOverride {
    Auto,
    Protein,
    Rna,
}

/// A structure file queued for parsing, with the label base its chains will
/// carry (input path minus directory prefix and suffix).
#[derive(Debug, Clone)]
pub struct ChainFile {
    pub path: PathBuf,
    pub label: String,
}

/// Resolve the positional argument into the list of structure files.
///
/// With `dir` set, the positional argument is a list file: each line names a
/// chain file `dir/<line><suffix>`. Without it, the argument is the structure
/// file itself and the label is the path as given.
pub fn collect_chain_files(
    input: &Path,
    dir: Option<&Path>,
    suffix: &str,
) -> Result<Vec<ChainFile>> {
    let Some(dir) = dir else {
        return Ok(vec![ChainFile {
            path: input.to_path_buf(),
            label: input.display().to_string(),
        }]);
    };

    let list = fs::read_to_string(input)
        .with_context(|| format!("cannot read chain list {}", input.display()))?;
    let mut files = Vec::new();
    for line in list.lines() {
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        files.push(ChainFile {
            path: dir.join(format!("{name}{suffix}")),
            label: name.to_string(),
        });
    }
    Ok(files)
}

/// Detect PDB vs PDBx/mmCIF from content: an `_atom_site.` loop or a leading
/// `data_` block marks mmCIF.
pub fn looks_like_cif(text: &str) -> bool {
    for line in text.lines() {
        let line = line.trim_start();
        if line.starts_with("_atom_site.") || line.starts_with("data_") {
            return true;
        }
        if line.starts_with("ATOM") || line.starts_with("HETATM") {
            return false;
        }
    }
    false
}

/// Parse every listed file into chain records. Files yielding zero chains
/// produce a warning and are skipped; a missing file is an error.
pub fn load_chains(
    files: &[ChainFile],
    opts: &ParseOptions,
    infmt: i32,
    mol_override: MolOverride,
) -> Result<Vec<ChainRecord>> {
    let bar = if files.len() > 1 {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap(),
        );
        Some(bar)
    } else {
        None
    };

    let mut records = Vec::new();
    for file in files {
        if let Some(bar) = &bar {
            bar.set_message(file.label.clone());
        }
        let text = fs::read_to_string(&file.path)
            .with_context(|| format!("cannot read structure file {}", file.path.display()))?;
        let use_cif = match infmt {
            0 => false,
            3 => true,
            _ => looks_like_cif(&text),
        };
        let parsed = if use_cif {
            parse_cif(&text, opts)
        } else {
            parse_pdb(&text, opts)
        };
        if parsed.is_empty() {
            eprintln!(
                "Warning! Cannot parse file: {}. Chain number 0.",
                file.path.display()
            );
            if let Some(bar) = &bar {
                bar.inc(1);
            }
            continue;
        }
        for raw in parsed {
            let label = format!("{}{}", file.label, raw.suffix);
            let record = finish_chain(label, raw, mol_override);
            eprintln!(
                "Parsing {}\t{} ({} residues).",
                file.path.display(),
                record.label(),
                record.len()
            );
            records.push(record);
        }
        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    Ok(records)
}

/// Turn a parsed chain into a record: residue codes, molecule tally,
/// secondary structure.
fn finish_chain(label: String, raw: RawChain, mol_override: MolOverride) -> ChainRecord {
    let mut xyz = Vec::with_capacity(raw.residues.len());
    let mut seq = Vec::with_capacity(raw.residues.len());
    let mut mol_type = 0;
    for res in &raw.residues {
        xyz.push(res.xyz);
        seq.push(residue_code(&res.comp));
        mol_type += residue_vote(&res.comp);
    }
    mol_type = match mol_override {
        MolOverride::Auto => mol_type,
        MolOverride::Protein => -1,
        MolOverride::Rna => 1,
    };
    let sec = secstr::assign(&xyz, mol_type);
    ChainRecord::new(label, mol_type, ChainData { xyz, seq, sec })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cif_detection() {
        assert!(looks_like_cif("data_1ABC\n#\nloop_\n_atom_site.id\n"));
        assert!(!looks_like_cif(
            "HEADER    TEST\nATOM      1  CA  ALA A   1      0.0     0.0    0.0\n"
        ));
        assert!(!looks_like_cif(""));
    }

    #[test]
    fn auto_atom_selection() {
        let opts = ParseOptions {
            ter: 3,
            split: 0,
            het: false,
            atom: "auto".into(),
            chains: vec![],
            models: vec![],
        };
        assert!(opts.atom_matches(" CA ", "ALA"));
        assert!(!opts.atom_matches(" CB ", "ALA"));
        assert!(opts.atom_matches(" C3'", "G"));
        assert!(!opts.atom_matches(" CA ", "G"));
    }

    #[test]
    fn explicit_atom_selection() {
        let opts = ParseOptions {
            ter: 3,
            split: 0,
            het: false,
            atom: " CB ".into(),
            chains: vec![],
            models: vec![],
        };
        assert!(opts.atom_matches(" CB ", "ALA"));
        assert!(!opts.atom_matches(" CA ", "ALA"));
    }
}
