//! Clustering CLI surface and validation

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use crate::structure::reader::{MolOverride, ParseOptions};

#[derive(Args, Debug)]
pub struct ClusterArgs {
    /// Structure file, or (with --dir) a list file naming one chain file per
    /// line.
    #[arg(value_name = "STRUCTURE")]
    pub input: PathBuf,

    /// TM-score cutoff for considering two structures similar, in [0.45, 1).
    #[arg(long = "TMcut", default_value_t = 0.5)]
    pub tm_cut: f64,

    /// Worker threads for the confirmation stage. Default: all CPU cores.
    #[arg(short = 't', long = "threads")]
    pub threads: Option<usize>,

    /// Which TM-score to use for chains of different lengths:
    /// 1 = larger (by shorter length), 2 = smaller (by longer length),
    /// 3 = average, 4 = harmonic average, 5 = geometric average,
    /// 6 = root mean square.
    #[arg(short = 's', long = "score-mode", default_value_t = 2)]
    pub score_mode: i32,

    /// Output file for the cluster result ('-' or absent: stdout).
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Cluster all chain files listed in STRUCTURE under this folder.
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// File-name suffix appended to each listed name (only with --dir).
    #[arg(long, default_value = "")]
    pub suffix: String,

    /// What ends a chain: 3 = TER/ENDMDL/END or chain-ID change,
    /// 2 = ENDMDL/END or chain-ID change, 1 = ENDMDL/END, 0 = end of file.
    #[arg(long, default_value_t = 3)]
    pub ter: i32,

    /// Splitting: 0 = whole structure is one chain, 1 = each MODEL is a
    /// chain (requires --ter 0), 2 = each chain ID is a chain (requires
    /// --ter 0 or 1).
    #[arg(long, default_value_t = 0)]
    pub split: i32,

    /// Input format: -1 = auto-detect, 0 = PDB, 3 = PDBx/mmCIF.
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub infmt: i32,

    /// 4-character atom name representing a residue; "auto" selects " CA "
    /// for proteins and " C3'" for nucleic acids.
    #[arg(long, default_value = "auto")]
    pub atom: String,

    /// Molecule type: auto, protein or RNA.
    #[arg(long, default_value = "auto")]
    pub mol: String,

    /// Also read residues marked HETATM (0 or 1).
    #[arg(long, default_value_t = 0)]
    pub het: i32,

    /// Fast but slightly less accurate final alignment.
    #[arg(long, default_value_t = false)]
    pub fast: bool,

    /// Tentative clustering file biasing candidate ranking.
    #[arg(long)]
    pub init: Option<PathBuf>,

    /// Chains to parse, comma-separated ('_' for a blank chain ID).
    #[arg(long, value_delimiter = ',')]
    pub chain: Vec<String>,

    /// Models to parse, comma-separated.
    #[arg(long, value_delimiter = ',')]
    pub model: Vec<String>,

    // Recognised for compatibility; rejected in validate().
    #[arg(short = 'u', long = "norm-len", hide = true)]
    pub norm_len: Option<f64>,
    #[arg(short = 'd', long = "d0-scale", hide = true)]
    pub d0_scale: Option<f64>,
    #[arg(short = 'a', long = "norm-avg", hide = true)]
    pub norm_avg: Option<String>,
    #[arg(long = "byresi", hide = true)]
    pub byresi: Option<i32>,
}

impl ClusterArgs {
    pub fn validate(&self) -> Result<()> {
        if self.norm_len.is_some() {
            bail!("-u/--norm-len has not been implemented yet");
        }
        if self.d0_scale.is_some() {
            bail!("-d/--d0-scale has not been implemented yet");
        }
        if self.norm_avg.is_some() {
            bail!("-a/--norm-avg is not used for clustering");
        }
        if self.byresi.is_some() {
            bail!("--byresi has not been implemented yet");
        }
        if !(0.45..1.0).contains(&self.tm_cut) {
            bail!("--TMcut must be in the range of [0.45,1)");
        }
        if !(1..=6).contains(&self.score_mode) {
            bail!("--score-mode must be within 1 to 6");
        }
        if self.threads == Some(0) {
            bail!("number of threads (-t) must be a positive integer");
        }
        if !self.suffix.is_empty() && self.dir.is_none() {
            bail!("--suffix is only valid if --dir is set");
        }
        if self.atom.len() != 4 {
            bail!("atom name must have 4 characters, including space");
        }
        if !matches!(self.mol.as_str(), "auto" | "protein" | "RNA") {
            bail!("molecule type must be either RNA or protein");
        }
        if !(0..=3).contains(&self.ter) {
            bail!("--ter can only be 0 to 3");
        }
        if !(0..=2).contains(&self.split) {
            bail!("--split can only be 0, 1 or 2");
        }
        if self.split == 1 && self.ter != 0 {
            bail!("--split 1 should be used with --ter 0");
        }
        if self.split == 2 && self.ter > 1 {
            bail!("--split 2 should be used with --ter 0 or 1");
        }
        match self.infmt {
            -1 | 0 | 3 => {}
            1 => bail!("--infmt 1 (SPICKER) has not been implemented yet"),
            2 => bail!("--infmt 2 (xyz) has not been implemented yet"),
            _ => bail!("--infmt must be between -1 and 3"),
        }
        if !matches!(self.het, 0 | 1) {
            bail!("--het must be 0 or 1");
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            ter: self.ter,
            split: self.split,
            het: self.het == 1,
            atom: self.atom.clone(),
            chains: self.chain.clone(),
            models: self.model.clone(),
        }
    }

    pub fn mol_override(&self) -> MolOverride {
        match self.mol.as_str() {
            "protein" => MolOverride::Protein,
            "RNA" => MolOverride::Rna,
            _ => MolOverride::Auto,
        }
    }
}
