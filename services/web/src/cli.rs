use crate::infra::connect_backend;
use crate::server;
use campus_portal::admissions::{AdmissionsBackend, Session, COURSE_CATALOG};
use campus_portal::config::AppConfig;
use campus_portal::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Campus Portal",
    about = "Serve the institute website and inspect the admissions backend",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the course catalog offered on the application form
    Courses,
    /// Query the admissions backend
    Applications {
        #[command(subcommand)]
        command: ApplicationsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ApplicationsCommand {
    /// Print the current application listing as JSON
    List(ListArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the admissions backend base URL
    #[arg(long)]
    pub(crate) backend_url: Option<String>,
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    /// Override the admissions backend base URL
    #[arg(long)]
    backend_url: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Courses => {
            print_courses();
            Ok(())
        }
        Command::Applications {
            command: ApplicationsCommand::List(args),
        } => list_applications(args).await,
    }
}

fn print_courses() {
    for course in COURSE_CATALOG {
        println!("{course}");
    }
}

async fn list_applications(args: ListArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    server::apply_backend_override(&mut config, args.backend_url)?;

    let backend = connect_backend(&config.backend)?;
    let records = backend.fetch_applications(&Session::anonymous()).await?;
    let rendered = serde_json::to_string_pretty(&records)
        .map_err(|err| AppError::Io(std::io::Error::from(err)))?;
    println!("{rendered}");
    Ok(())
}
