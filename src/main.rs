use clap::Parser;
use influxdb_testdata::{
    Builder, Config, Error, Fleet, Generator, Measurement, Point, Window, report,
};
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Generate realistic time-series test data and write it to InfluxDB 1.x.
#[derive(Parser)]
#[command(name = "influxdb-testdata")]
#[command(version)]
struct Cli {
    /// InfluxDB host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// InfluxDB HTTP port
    #[arg(long, default_value_t = 8086)]
    port: u16,

    /// Target database
    #[arg(long, default_value = "testdb")]
    database: String,

    /// Length of the generated window, ending now
    #[arg(long, default_value_t = 120)]
    minutes: usize,

    /// Lines per write request
    #[arg(long, default_value_t = 1000)]
    batch_size: usize,

    /// Number of simulated hosts
    #[arg(long, default_value_t = 4)]
    hosts: usize,

    /// Seed for reproducible data
    #[arg(long)]
    seed: Option<u64>,

    /// Timeout per write request in seconds
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Print line protocol to stdout instead of writing it
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            minutes: self.minutes,
            batch_size: self.batch_size,
            hosts: self.hosts,
            seed: self.seed,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match run(cli.config(), cli.dry_run) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            if let Some(body) = err.body() {
                eprintln!("Response: {}", body);
            }
            ExitCode::FAILURE
        }
    }
}

fn run(config: Config, dry_run: bool) -> Result<(), Error> {
    config.validate()?;

    let window = Window::ending_now(config.minutes)?;
    let mut generator = Generator::new(Fleet::with_hosts(config.hosts), config.seed);

    if dry_run {
        for (_, points) in generator.generate_all(&window) {
            for point in &points {
                println!("{}", point);
            }
        }
        return Ok(());
    }

    report::print_header(&config);

    let mut lines = vec![];
    for measurement in Measurement::ALL {
        report::print_generating(measurement);
        let points = generator.generate(measurement, &window);
        report::print_generated(points.len());
        lines.extend(points.iter().map(Point::to_line_protocol));
    }
    report::print_total(lines.len());

    let batcher = Builder::new(config.write_url())
        .batch_size(config.batch_size)
        .timeout(config.timeout)
        .build()?;

    println!("Inserting data into InfluxDB...");
    let summary = batcher.upload_with_progress(&lines, report::print_batch)?;
    info!(?summary, "upload finished");

    report::print_summary(&summary);
    Ok(())
}
