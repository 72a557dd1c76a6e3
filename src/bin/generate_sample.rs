use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

/// Write a synthetic paper metadata file for demos and manual testing.
#[derive(Parser)]
#[command(name = "generate_sample", about)]
struct Args {
    /// Output path; `.parquet` writes Parquet, anything else CSV
    #[arg(default_value = "metadata.csv")]
    output: PathBuf,

    /// Number of rows to generate
    #[arg(long, default_value_t = 500)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

const JOURNALS: [&str; 8] = [
    "The Lancet",
    "BMJ",
    "Nature",
    "Science",
    "PLoS One",
    "Virology Journal",
    "Journal of Virology",
    "Emerging Infectious Diseases",
];

const SURNAMES: [&str; 8] = ["Chen", "Smith", "Garcia", "Müller", "Okafor", "Ivanova", "Tanaka", "Silva"];

const TOPIC_WORDS: [&str; 16] = [
    "coronavirus", "transmission", "respiratory", "vaccine", "clinical", "outcomes", "patients",
    "infection", "epidemiology", "SARS-CoV-2", "immune", "response", "model", "analysis",
    "hospital", "cohort",
];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }

    /// True with probability `percent / 100`.
    fn chance(&mut self, percent: usize) -> bool {
        self.below(100) < percent
    }
}

/// One generated row; `None` fields are written as empty cells / nulls.
struct Row {
    title: Option<String>,
    authors: Option<String>,
    journal: Option<String>,
    publish_time: Option<String>,
    abstract_text: Option<String>,
}

fn words(rng: &mut SimpleRng, count: usize) -> String {
    (0..count)
        .map(|_| rng.pick(&TOPIC_WORDS))
        .collect::<Vec<_>>()
        .join(" ")
}

fn generate_row(rng: &mut SimpleRng) -> Row {
    // Later years are more common, like the real corpus.
    let year = 2015 + [0, 1, 2, 3, 4, 5, 5, 5, 6, 6][rng.below(10)];
    let month = 1 + rng.below(12);
    let day = 1 + rng.below(28);

    // A few rows use other date spellings, some are not dates at all.
    let publish_time = match rng.below(20) {
        0 => None,
        1 => Some("unknown".to_string()),
        2 => Some(year.to_string()),
        3 => Some(format!("{year} {}", ["Jan", "Apr", "Jul", "Oct"][rng.below(4)])),
        _ => Some(format!("{year}-{month:02}-{day:02}")),
    };

    let title = if rng.chance(3) {
        None
    } else {
        let len = 4 + rng.below(8);
        Some(words(rng, len))
    };

    let n_authors = 1 + rng.below(4);
    let authors = if rng.chance(10) {
        None
    } else {
        Some(
            (0..n_authors)
                .map(|_| format!("{}, {}.", rng.pick(&SURNAMES), (b'A' + rng.below(26) as u8) as char))
                .collect::<Vec<_>>()
                .join("; "),
        )
    };

    let journal = if rng.chance(15) {
        None
    } else {
        Some(rng.pick(&JOURNALS).to_string())
    };

    let abstract_text = if rng.chance(20) {
        None
    } else {
        let len = 20 + rng.below(200);
        Some(words(rng, len))
    };

    Row {
        title,
        authors,
        journal,
        publish_time,
        abstract_text,
    }
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(["cord_uid", "title", "authors", "journal", "publish_time", "abstract"])?;
    for (i, row) in rows.iter().enumerate() {
        writer.write_record([
            format!("uid{i:06}").as_str(),
            row.title.as_deref().unwrap_or(""),
            row.authors.as_deref().unwrap_or(""),
            row.journal.as_deref().unwrap_or(""),
            row.publish_time.as_deref().unwrap_or(""),
            row.abstract_text.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    fn column(rows: &[Row], get: fn(&Row) -> Option<&str>) -> ArrayRef {
        Arc::new(rows.iter().map(get).collect::<StringArray>())
    }

    let names = ["title", "authors", "journal", "publish_time", "abstract"];
    let schema = Arc::new(Schema::new(
        names
            .iter()
            .map(|n| Field::new(*n, DataType::Utf8, true))
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            column(rows, |r| r.title.as_deref()),
            column(rows, |r| r.authors.as_deref()),
            column(rows, |r| r.journal.as_deref()),
            column(rows, |r| r.publish_time.as_deref()),
            column(rows, |r| r.abstract_text.as_deref()),
        ],
    )
    .context("building record batch")?;

    let preview = batch.slice(0, batch.num_rows().min(3));
    log::debug!(
        "first rows:\n{}",
        arrow::util::pretty::pretty_format_batches(&[preview]).context("formatting preview")?
    );

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut rng = SimpleRng::new(args.seed);
    let rows: Vec<Row> = (0..args.rows).map(|_| generate_row(&mut rng)).collect();

    let is_parquet = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));

    if is_parquet {
        write_parquet(&args.output, &rows)?;
    } else {
        write_csv(&args.output, &rows)?;
    }

    println!("Wrote {} rows to {}", rows.len(), args.output.display());
    Ok(())
}
