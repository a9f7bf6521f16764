//! PDBx/mmCIF parsing
//!
//! Reads the `_atom_site` loop only. Values are whitespace-separated with
//! single/double-quote escaping (atom names like `"C3'"` arrive quoted).
//! mmCIF has no TER records, so the `--ter 3` policy behaves like `--ter 2`;
//! a model-number change plays the role of ENDMDL.

use super::reader::{ParseOptions, RawChain, RawResidue};

pub fn parse_cif(text: &str, opts: &ParseOptions) -> Vec<RawChain> {
    let mut chains: Vec<RawChain> = Vec::new();
    let mut cur: Vec<RawResidue> = Vec::new();
    let mut cur_suffix = String::new();

    let mut tags: Vec<String> = Vec::new();
    let mut in_atom_loop = false;
    let mut in_header = false;

    let mut cols = AtomSiteColumns::default();
    let mut last_chain: Option<String> = None;
    let mut last_model: Option<String> = None;
    let mut last_res: Option<(String, String)> = None;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed == "loop_" {
            tags.clear();
            in_header = true;
            in_atom_loop = false;
            continue;
        }
        if in_header {
            if trimmed.starts_with('_') {
                tags.push(trimmed.to_string());
                continue;
            }
            in_header = false;
            if tags.iter().any(|t| t.starts_with("_atom_site.")) {
                cols = AtomSiteColumns::from_tags(&tags);
                in_atom_loop = cols.is_usable();
            }
            // fall through: the current line is the first data row
        }
        if !in_atom_loop {
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('_') || trimmed == "loop_" {
            in_atom_loop = false;
            continue;
        }

        let fields = split_cif_row(trimmed);
        let Some(group) = cols.get(&fields, cols.group) else {
            continue;
        };
        let het = group == "HETATM";
        if !(group == "ATOM" || (het && opts.het)) {
            continue;
        }

        let model = cols.get(&fields, cols.model).unwrap_or("1").to_string();
        if let Some(prev) = &last_model {
            if *prev != model {
                if opts.ter >= 1 {
                    break;
                }
                if opts.split == 1 {
                    flush(&mut chains, &mut cur, &mut cur_suffix);
                    last_res = None;
                }
            }
        }
        last_model = Some(model.clone());
        if !opts.models.is_empty() && !opts.models.contains(&model) {
            continue;
        }

        let chain = cols
            .get(&fields, cols.asym)
            .filter(|c| *c != "." && *c != "?")
            .unwrap_or("_")
            .to_string();
        if !opts.chains.is_empty() && !opts.chains.contains(&chain) {
            continue;
        }
        if let Some(prev) = &last_chain {
            if *prev != chain {
                if opts.ter >= 2 {
                    break;
                }
                if opts.split == 2 {
                    flush(&mut chains, &mut cur, &mut cur_suffix);
                    last_res = None;
                }
            }
        }
        last_chain = Some(chain.clone());

        let Some(comp) = cols.get(&fields, cols.comp) else {
            continue;
        };
        let Some(name) = cols.get(&fields, cols.atom) else {
            continue;
        };
        if !opts.atom_matches(name, comp) {
            continue;
        }
        if let Some(alt) = cols.get(&fields, cols.alt) {
            if alt != "." && alt != "?" && alt != "A" {
                continue;
            }
        }
        let seq_id = cols.get(&fields, cols.seq).unwrap_or(".").to_string();
        let res_key = (chain.clone(), seq_id);
        if last_res.as_ref() == Some(&res_key) {
            continue;
        }

        let (Some(Ok(x)), Some(Ok(y)), Some(Ok(z))) = (
            cols.get(&fields, cols.x).map(str::parse::<f64>),
            cols.get(&fields, cols.y).map(str::parse::<f64>),
            cols.get(&fields, cols.z).map(str::parse::<f64>),
        ) else {
            continue;
        };

        if cur.is_empty() {
            cur_suffix = match opts.split {
                1 => format!(":{model}"),
                2 => format!(":{chain}"),
                _ => String::new(),
            };
        }
        cur.push(RawResidue {
            xyz: [x, y, z],
            comp: comp.to_string(),
        });
        last_res = Some(res_key);
    }

    flush(&mut chains, &mut cur, &mut cur_suffix);
    chains
}

fn flush(chains: &mut Vec<RawChain>, cur: &mut Vec<RawResidue>, suffix: &mut String) {
    if !cur.is_empty() {
        chains.push(RawChain {
            suffix: std::mem::take(suffix),
            residues: std::mem::take(cur),
        });
    }
}

/// Column indices of the `_atom_site` tags the parser consumes. `auth_*`
/// names take precedence over `label_*` when both are present.
#[derive(Debug, Default)]
struct AtomSiteColumns {
    group: Option<usize>,
    atom: Option<usize>,
    comp: Option<usize>,
    asym: Option<usize>,
    seq: Option<usize>,
    alt: Option<usize>,
    model: Option<usize>,
    x: Option<usize>,
    y: Option<usize>,
    z: Option<usize>,
}

impl AtomSiteColumns {
    fn from_tags(tags: &[String]) -> Self {
        let mut cols = Self::default();
        let idx = |suffix: &str| {
            tags.iter()
                .position(|t| t == &format!("_atom_site.{suffix}"))
        };
        cols.group = idx("group_PDB");
        cols.atom = idx("auth_atom_id").or_else(|| idx("label_atom_id"));
        cols.comp = idx("auth_comp_id").or_else(|| idx("label_comp_id"));
        cols.asym = idx("auth_asym_id").or_else(|| idx("label_asym_id"));
        cols.seq = idx("auth_seq_id").or_else(|| idx("label_seq_id"));
        cols.alt = idx("label_alt_id");
        cols.model = idx("pdbx_PDB_model_num");
        cols.x = idx("Cartn_x");
        cols.y = idx("Cartn_y");
        cols.z = idx("Cartn_z");
        cols
    }

    fn is_usable(&self) -> bool {
        self.group.is_some()
            && self.atom.is_some()
            && self.comp.is_some()
            && self.x.is_some()
            && self.y.is_some()
            && self.z.is_some()
    }

    fn get<'a>(&self, fields: &[&'a str], col: Option<usize>) -> Option<&'a str> {
        col.and_then(|i| fields.get(i).copied())
    }
}

/// Split one data row on whitespace, honouring '...' and "..." quoting.
fn split_cif_row(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        if bytes[i] == b'\'' || bytes[i] == b'"' {
            let quote = bytes[i];
            let start = i + 1;
            let mut end = start;
            while end < bytes.len() && bytes[end] != quote {
                end += 1;
            }
            fields.push(&line[start..end]);
            i = end + 1;
        } else {
            let start = i;
            while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            fields.push(&line[start..i]);
        }
    }
    fields
}
