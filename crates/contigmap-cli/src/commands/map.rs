use crate::cli::MapArgs;
use crate::config::build_config;
use crate::error::{CliError, Result};
use contigmap::core::io::pdb_idx;
use contigmap::workflows::map::{self, ContigMap};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io::Write;
use std::path::Path;
use tracing::info;

pub fn run(args: MapArgs) -> Result<()> {
    info!("Merging configuration from file and CLI arguments...");
    let app = build_config(&args)?;

    info!("Loading reference residues from {:?}", &app.reference_path);
    let reference = pdb_idx::read_from_path(&app.reference_path)?;
    info!("Loaded {} reference residues.", reference.residues().len());

    let mut rng = match app.seed {
        Some(seed) => {
            info!(seed, "Using fixed sampling seed.");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let contig_map = map::run(&reference, &app.core_config, &mut rng)?;

    write_positions(&contig_map, std::fs::File::create(&app.output_path)?).map_err(|e| {
        CliError::FileWriting {
            path: app.output_path.clone(),
            source: e.into(),
        }
    })?;
    println!(
        "✓ Mapped {} positions ({} generated chain(s){}) to: {}",
        contig_map.len(),
        contig_map.inpaint_chains,
        contig_map
            .receptor_chain
            .map(|c| format!(", receptor chain {}", c))
            .unwrap_or_default(),
        app.output_path.display()
    );

    if let Some(path) = &app.mappings_path {
        write_mappings(&contig_map, path)?;
        println!("  Mappings written to: {}", path.display());
    }
    Ok(())
}

/// One row per output position; secondary structure columns only when constraints exist.
fn write_positions(contig_map: &ContigMap, writer: impl Write) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let ss = contig_map.secondary_structure.as_ref();

    let mut header = vec![
        "position",
        "ref",
        "hal",
        "rf",
        "mask_1d",
        "inpaint_seq",
        "inpaint_str",
    ];
    if ss.is_some() {
        header.extend(["helix", "strand", "loop"]);
    }
    wtr.write_record(&header)?;

    let m = &contig_map.mapping;
    for i in 0..m.len() {
        let mut record = vec![
            i.to_string(),
            m.ref_idx[i].to_string(),
            m.hal_idx[i].to_string(),
            m.idx_rf[i].to_string(),
            m.mask_1d[i].to_string(),
            m.inpaint_seq[i].to_string(),
            m.inpaint_str[i].to_string(),
        ];
        if let Some(ss) = ss {
            record.extend([
                ss.helix[i].to_string(),
                ss.strand[i].to_string(),
                ss.loop_[i].to_string(),
            ]);
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_mappings(contig_map: &ContigMap, path: &Path) -> Result<()> {
    let content = toml::to_string(&contig_map.mappings()).map_err(|e| CliError::FileWriting {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::MapArgs;
    use std::fs;
    use tempfile::tempdir;

    fn write_reference(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("reference.csv");
        let mut content = String::from("chain,residue\n");
        for n in 1..=10 {
            content.push_str(&format!("A,{}\n", n));
        }
        for n in 1..=5 {
            content.push_str(&format!("B,{}\n", n));
        }
        fs::write(&path, content).unwrap();
        path
    }

    fn map_args(dir: &Path, contigs: &str) -> MapArgs {
        MapArgs {
            reference: write_reference(dir),
            output: dir.join("positions.csv"),
            config: None,
            mappings: Some(dir.join("mappings.toml")),
            contigs: Some(contigs.to_string()),
            topology_only: false,
            no_topology_only: false,
            length: None,
            symmetry_order: None,
            max_attempts: None,
            seed: Some(1),
            inpaint_seq: None,
            inpaint_str: None,
            helix: None,
            strand: None,
            loop_: None,
            provide_seq: None,
            set_values: vec![],
        }
    }

    #[test]
    fn map_writes_position_table_and_mappings() {
        let dir = tempdir().unwrap();
        let args = map_args(dir.path(), "A2-3/2-2 B1-2");
        run(args).unwrap();

        let table = fs::read_to_string(dir.path().join("positions.csv")).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(
            lines[0],
            "position,ref,hal,rf,mask_1d,inpaint_seq,inpaint_str"
        );
        assert_eq!(lines[1], "0,A2,A1,0,true,true,true");
        assert_eq!(lines[3], "2,_,A3,2,false,false,false");
        assert_eq!(lines[5], "4,B1,B5,204,true,true,true");
        assert_eq!(lines.len(), 7);

        let mappings = fs::read_to_string(dir.path().join("mappings.toml")).unwrap();
        assert!(mappings.contains("con_ref_pdb_idx"));
        assert!(mappings.contains("receptor_con_ref_idx0"));
        assert!(mappings.contains("sampled_mask"));
    }

    #[test]
    fn secondary_structure_adds_columns() {
        let dir = tempdir().unwrap();
        let mut args = map_args(dir.path(), "A1-4/3-3");
        args.mappings = None;
        args.inpaint_str = Some("A2-3".to_string());
        args.strand = Some("A3".to_string());
        run(args).unwrap();

        let table = fs::read_to_string(dir.path().join("positions.csv")).unwrap();
        let lines: Vec<&str> = table.lines().collect();
        assert!(lines[0].ends_with("helix,strand,loop"));
        assert!(lines[3].ends_with("false,true,false"));
    }

    #[test]
    fn residue_missing_from_reference_fails() {
        let dir = tempdir().unwrap();
        let args = map_args(dir.path(), "C1-3/5-5");
        assert!(matches!(run(args), Err(CliError::Contig(_))));
    }

    #[test]
    fn missing_reference_file_fails() {
        let dir = tempdir().unwrap();
        let mut args = map_args(dir.path(), "5-5");
        args.reference = dir.path().join("absent.csv");
        assert!(matches!(run(args), Err(CliError::Reference(_))));
    }
}
