use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileMaskConfig, FileSamplingConfig};
use super::models::AppConfig;
use crate::cli::MapArgs;
use crate::error::{CliError, Result};
use contigmap::core::models::residue::ResidueRange;
use contigmap::engine::config::{ContigMapConfigBuilder, LengthRange, MaskSource, ProvideSeq};
use std::str::FromStr;
use tracing::debug;

/// Merges command-line flags, `--set` overrides, the TOML file and built-in defaults, in
/// that order of precedence.
pub fn build_config(args: &MapArgs) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, &args.set_values)?;

    let sampling_file = file_config.sampling.take().unwrap_or_default();
    let masks_file = file_config.masks.take().unwrap_or_default();

    let contigs = args
        .contigs
        .clone()
        .or(file_config.contigs)
        .ok_or_else(|| {
            CliError::Config("A contig specification is required (--contigs or `contigs`)".to_string())
        })?;
    let topology_only = args
        .topology_override()
        .or(file_config.topology_only)
        .unwrap_or(defaults.topology_only);
    let max_attempts = args
        .max_attempts
        .or(sampling_file.max_attempts)
        .unwrap_or(defaults.max_attempts);

    let mut builder = ContigMapConfigBuilder::new()
        .contigs(contigs)
        .topology_only(topology_only)
        .max_attempts(max_attempts);

    if let Some(length) = pick(&args.length, &sampling_file.length) {
        builder = builder.length(parse_value::<LengthRange>("length", length)?);
    }
    if let Some(order) = args.symmetry_order.or(sampling_file.symmetry) {
        builder = builder.symmetry_order(order);
    }

    let masks = MaskValues::merge(args, &masks_file);
    if let Some(list) = masks.inpaint_seq {
        builder = builder.inpaint_seq(MaskSource::Residues(parse_residues("inpaint-seq", list)?));
    }
    if let Some(list) = masks.inpaint_str {
        builder = builder.inpaint_str(MaskSource::Residues(parse_residues("inpaint-str", list)?));
    }
    if let Some(list) = masks.helix {
        builder = builder.helix(parse_residues("helix", list)?);
    }
    if let Some(list) = masks.strand {
        builder = builder.strand(parse_residues("strand", list)?);
    }
    if let Some(list) = masks.loop_ {
        builder = builder.loop_(parse_residues("loop", list)?);
    }
    if let Some(positions) = masks.provide_seq {
        builder = builder.provide_seq(parse_value::<ProvideSeq>("provide-seq", positions)?);
    }

    let core_config = builder
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;
    debug!("Final configuration: {:?}", core_config);

    Ok(AppConfig {
        reference_path: args.reference.clone(),
        output_path: args.output.clone(),
        mappings_path: args.mappings.clone(),
        seed: args.seed.or(sampling_file.seed),
        core_config,
    })
}

struct MaskValues<'a> {
    inpaint_seq: Option<&'a str>,
    inpaint_str: Option<&'a str>,
    helix: Option<&'a str>,
    strand: Option<&'a str>,
    loop_: Option<&'a str>,
    provide_seq: Option<&'a str>,
}

impl<'a> MaskValues<'a> {
    fn merge(args: &'a MapArgs, file: &'a FileMaskConfig) -> Self {
        Self {
            inpaint_seq: pick(&args.inpaint_seq, &file.inpaint_seq),
            inpaint_str: pick(&args.inpaint_str, &file.inpaint_str),
            helix: pick(&args.helix, &file.helix),
            strand: pick(&args.strand, &file.strand),
            loop_: pick(&args.loop_, &file.loop_),
            provide_seq: pick(&args.provide_seq, &file.provide_seq),
        }
    }
}

fn pick<'a>(cli: &'a Option<String>, file: &'a Option<String>) -> Option<&'a str> {
    cli.as_deref().or(file.as_deref())
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e| CliError::Argument(format!("Invalid value for {}: {}", key, e)))
}

fn parse_residues(key: &str, value: &str) -> Result<Vec<ResidueRange>> {
    ResidueRange::parse_list(value)
        .map_err(|e| CliError::Argument(format!("Invalid residue list for {}: {}", key, e)))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let value = Some(value_str.to_string());

        if let Some(field) = key.strip_prefix("sampling.") {
            let sampling = config
                .sampling
                .get_or_insert_with(FileSamplingConfig::default);
            match field {
                "length" => sampling.length = value,
                "symmetry" => sampling.symmetry = Some(parse_set_value(key, value_str)?),
                "max-attempts" => sampling.max_attempts = Some(parse_set_value(key, value_str)?),
                "seed" => sampling.seed = Some(parse_set_value(key, value_str)?),
                _ => return Err(unsupported_key(key)),
            }
        } else if let Some(field) = key.strip_prefix("masks.") {
            let masks = config.masks.get_or_insert_with(FileMaskConfig::default);
            let slot = match field {
                "inpaint-seq" => &mut masks.inpaint_seq,
                "inpaint-str" => &mut masks.inpaint_str,
                "helix" => &mut masks.helix,
                "strand" => &mut masks.strand,
                "loop" => &mut masks.loop_,
                "provide-seq" => &mut masks.provide_seq,
                _ => return Err(unsupported_key(key)),
            };
            *slot = value;
        } else {
            match key {
                "contigs" => config.contigs = value,
                "topology-only" => config.topology_only = Some(parse_set_value(key, value_str)?),
                _ => return Err(unsupported_key(key)),
            }
        }
    }
    Ok(config)
}

fn parse_set_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid value for {}: {}", key, value))
    })
}

fn unsupported_key(key: &str) -> CliError {
    CliError::Config(format!(
        "Unsupported configuration key for --set: '{}'",
        key
    ))
}
