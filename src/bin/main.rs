use ant_ls::AntLs;
use ant_ls::completion::TaskCatalog;
use clap::{Parser, Subcommand};
use tokio::io::{stdin, stdout};
use tower_lsp_server::{LspService, Server};

/// A headless Language Server Protocol (LSP) server for Apache Ant build files
#[derive(Parser)]
#[command(name = "ant-ls")]
#[command(version)]
#[command(about = "A headless LSP server providing code completion for Ant build files")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the known Ant tasks and their descriptions
    Tasks,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Tasks) => {
            // Exercises the same one-shot catalog initialization the server
            // performs on its first completion request.
            match TaskCatalog::global() {
                Ok(catalog) => {
                    for def in catalog.tasks() {
                        match def.description() {
                            Some(desc) => println!("{} - {}", def.name(), desc),
                            None => println!("{}", def.name()),
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        None => {
            // Start LSP server (default behavior)
            let stdin = stdin();
            let stdout = stdout();

            let (service, socket) = LspService::new(AntLs::new);
            Server::new(stdin, stdout, socket).serve(service).await;
        }
    }
}
