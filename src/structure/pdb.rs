//! Line-oriented PDB parsing
//!
//! Extracts one representative atom per residue, honouring the termination
//! (`--ter`), splitting (`--split`), HETATM, chain and model policies.
//! Column layout follows the PDB fixed-width convention: atom name 13-16,
//! altLoc 17, residue name 18-20, chain ID 22, residue seq+iCode 23-27,
//! coordinates 31-54.

use super::reader::{ParseOptions, RawChain, RawResidue};

pub fn parse_pdb(text: &str, opts: &ParseOptions) -> Vec<RawChain> {
    let mut chains: Vec<RawChain> = Vec::new();
    let mut cur: Vec<RawResidue> = Vec::new();
    let mut cur_suffix = String::new();

    let mut model = 1i64;
    let mut last_chain: Option<char> = None;
    let mut last_res: Option<(char, String)> = None;

    for line in text.lines() {
        if line.starts_with("MODEL") {
            let next = line
                .split_whitespace()
                .nth(1)
                .and_then(|s| s.parse::<i64>().ok())
                .unwrap_or(model + 1);
            if opts.split == 1 {
                flush(&mut chains, &mut cur, &mut cur_suffix);
            }
            model = next;
            last_res = None;
            continue;
        }
        if line.starts_with("ENDMDL") || line == "END" || line.starts_with("END ") {
            if opts.ter >= 1 {
                break;
            }
            if opts.split == 1 {
                flush(&mut chains, &mut cur, &mut cur_suffix);
            }
            last_res = None;
            continue;
        }
        if line.starts_with("TER") {
            if opts.ter >= 3 {
                break;
            }
            continue;
        }

        let het = line.starts_with("HETATM");
        if !(line.starts_with("ATOM  ") || (het && opts.het)) {
            continue;
        }
        if line.len() < 54 {
            continue;
        }

        if !opts.models.is_empty() && !opts.models.iter().any(|m| m == &model.to_string()) {
            continue;
        }

        let chain_id = line.as_bytes()[21] as char;
        let chain_name = if chain_id == ' ' {
            "_".to_string()
        } else {
            chain_id.to_string()
        };
        if !opts.chains.is_empty() && !opts.chains.contains(&chain_name) {
            continue;
        }

        if let Some(prev) = last_chain {
            if prev != chain_id {
                if opts.ter >= 2 {
                    break;
                }
                if opts.split == 2 {
                    flush(&mut chains, &mut cur, &mut cur_suffix);
                    last_res = None;
                }
            }
        }
        last_chain = Some(chain_id);

        let comp = line[17..20].trim();
        if !opts.atom_matches(&line[12..16], comp) {
            continue;
        }
        let alt = line.as_bytes()[16] as char;
        if alt != ' ' && alt != 'A' {
            continue;
        }
        // one representative atom per residue
        let res_key = (chain_id, line[22..27].to_string());
        if last_res.as_ref() == Some(&res_key) {
            continue;
        }

        let (Ok(x), Ok(y), Ok(z)) = (
            line[30..38].trim().parse::<f64>(),
            line[38..46].trim().parse::<f64>(),
            line[46..54].trim().parse::<f64>(),
        ) else {
            continue;
        };

        if cur.is_empty() {
            cur_suffix = match opts.split {
                1 => format!(":{model}"),
                2 => format!(":{chain_name}"),
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
