//! Configuration types for resolved CLI arguments.
//!
//! Args structs are what clap parses; Config structs are built from them via
//! TryFrom and hold loaded alphabets and matrices.

use ctc_text::{AlphabetMap, BLANK, ProbabilityMatrix, ScoreKind};
use eyre::{Result, WrapErr, bail};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default number of hypotheses kept per time step.
const DEFAULT_BEAM_SIZE: usize = 16;

/// Default number of hypotheses printed.
const DEFAULT_TOP: usize = 5;

/// Alphabet selection shared by every subcommand.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct AlphabetArgs {
    /// JSON or YAML alphabet file (default: space, a-z and the blank `ϵ`)
    #[arg(short, long)]
    pub alphabet: Option<PathBuf>,
}

/// On-disk alphabet description.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AlphabetFile {
    /// `{"symbols": ["a", "b", "ϵ"], "blank": "ϵ"}`
    Symbols {
        symbols: Vec<String>,
        #[serde(default)]
        blank: Option<String>,
    },
    /// Character-to-index mapping; only the keys are used.
    Mapping(BTreeMap<String, serde_json::Value>),
}

/// Alphabet file syntax, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AlphabetFormat {
    Json,
    Yaml,
}

impl AlphabetFormat {
    fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(OsStr::to_str) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => bail!(
                "alphabet file must have a .json, .yaml or .yml extension: {}",
                path.display()
            ),
        }
    }
}

/// Resolved alphabet configuration.
#[derive(Debug)]
pub struct AlphabetConfig {
    pub alphabet: Arc<AlphabetMap>,
}

impl TryFrom<AlphabetArgs> for AlphabetConfig {
    type Error = eyre::Error;

    fn try_from(args: AlphabetArgs) -> Result<Self> {
        let alphabet = match args.alphabet {
            Some(path) => load_alphabet(&path)?,
            None => AlphabetMap::simple_ctc(),
        };

        tracing::debug!(
            size = alphabet.size(),
            blank = alphabet.has_blank(),
            "alphabet ready"
        );

        Ok(Self {
            alphabet: Arc::new(alphabet),
        })
    }
}

/// Load an alphabet from a JSON or YAML file.
///
/// Without an explicit `blank`, the reserved `ϵ` becomes the blank when the
/// file lists it; otherwise the alphabet has no blank.
pub fn load_alphabet(path: &Path) -> Result<AlphabetMap> {
    tracing::info!(path = %path.display(), "loading alphabet");

    let format = AlphabetFormat::from_path(path)?;

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read alphabet: {}", path.display()))?;

    let file: AlphabetFile = match format {
        AlphabetFormat::Json => serde_json::from_str(&content)
            .wrap_err_with(|| format!("failed to parse alphabet: {}", path.display()))?,
        AlphabetFormat::Yaml => serde_yaml::from_str(&content)
            .wrap_err_with(|| format!("failed to parse alphabet: {}", path.display()))?,
    };

    let (symbols, blank) = match file {
        AlphabetFile::Symbols { symbols, blank } => (symbols, blank),
        AlphabetFile::Mapping(mapping) => (mapping.into_keys().collect(), None),
    };

    let chars = symbols
        .iter()
        .map(|symbol| single_char(symbol))
        .collect::<Result<Vec<_>>>()?;

    let blank = match blank {
        Some(blank) => Some(single_char(&blank)?),
        None => chars.contains(&BLANK).then_some(BLANK),
    };

    let alphabet = match blank {
        Some(blank) => AlphabetMap::with_blank(chars, blank)?,
        None => AlphabetMap::new(chars)?,
    };

    Ok(alphabet)
}

fn single_char(symbol: &str) -> Result<char> {
    let mut chars = symbol.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => bail!("alphabet symbol must be a single character: {symbol:?}"),
    }
}

/// Probability matrix input.
#[derive(clap::Args, Clone, Debug)]
pub struct MatrixArgs {
    /// JSON file with one array of class scores per time step; `null` marks a
    /// zero probability (`-inf` with --log-probs)
    pub matrix: PathBuf,

    /// Read scores as natural-log probabilities
    #[arg(long)]
    pub log_probs: bool,
}

impl TryFrom<MatrixArgs> for ProbabilityMatrix {
    type Error = eyre::Error;

    fn try_from(args: MatrixArgs) -> Result<Self> {
        let kind = if args.log_probs {
            ScoreKind::LogProbabilities
        } else {
            ScoreKind::Probabilities
        };
        load_matrix(&args.matrix, kind)
    }
}

/// Load a `T × V` score matrix from a JSON array of rows.
///
/// `null` entries stand for a zero probability in either score kind.
pub fn load_matrix(path: &Path, kind: ScoreKind) -> Result<ProbabilityMatrix> {
    tracing::info!(path = %path.display(), ?kind, "loading matrix");

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read matrix: {}", path.display()))?;

    let rows: Vec<Vec<Option<f32>>> = serde_json::from_str(&content)
        .wrap_err_with(|| format!("failed to parse matrix: {}", path.display()))?;

    // JSON has no infinities, so zero probabilities arrive as `null`.
    let zero = match kind {
        ScoreKind::Probabilities => 0.0,
        ScoreKind::LogProbabilities => f32::NEG_INFINITY,
    };
    let rows: Vec<Vec<f32>> = rows
        .into_iter()
        .map(|row| row.into_iter().map(|score| score.unwrap_or(zero)).collect())
        .collect();

    let matrix = ProbabilityMatrix::from_rows(&rows, kind)
        .wrap_err_with(|| format!("invalid matrix: {}", path.display()))?;

    tracing::debug!(
        steps = matrix.num_steps(),
        classes = matrix.num_classes(),
        "matrix loaded"
    );

    Ok(matrix)
}

/// Beam search options.
#[derive(clap::Args, Clone, Copy, Debug)]
pub struct BeamConfig {
    /// Hypotheses kept after each time step
    #[arg(short, long, default_value_t = DEFAULT_BEAM_SIZE)]
    pub beam_size: usize,

    /// Hypotheses printed, best first
    #[arg(long, default_value_t = DEFAULT_TOP)]
    pub top: usize,
}

impl Default for BeamConfig {
    fn default() -> Self {
        Self {
            beam_size: DEFAULT_BEAM_SIZE,
            top: DEFAULT_TOP,
        }
    }
}
