#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]
#![allow(clippy::print_stdout)]

//! Terminal browser for proposals and deputies.
//!
//! ```text
//! cargo run --bin browse -- proposicoes --query "tipo=PL&q=saude"
//! > next
//! > filter ano=2024
//! > search educação
//! ```

use std::sync::Arc;
use std::time::Duration;

use camara_explorer_api::{
    camara::{
        CamaraApiClient, Deputado, DeputadoFilters, HttpCamaraClient, ListFilters, Proposicao,
        ProposicaoFilters, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE,
    },
    listing::{
        deputado_item, proposicao_item, DeputadosSource, ListItem, ListSnapshot, ListView,
        LoadStatus, PageFetcher, PaginatedController, ProposicoesSource, ViewState,
    },
};
use clap::{Parser, ValueEnum};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Resource {
    Proposicoes,
    Deputados,
}

#[derive(Debug, Parser)]
#[command(about = "Browse Câmara dos Deputados open data from the terminal")]
struct Args {
    /// Which list to browse
    #[arg(value_enum, default_value = "proposicoes")]
    resource: Resource,

    /// Initial view query, e.g. `q=saude&tipo=PL&page=2`
    #[arg(long, default_value = "")]
    query: String,

    /// Upstream API base URL
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Items per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout_secs: u64,
}

const HELP: &str = "\
commands:
  next | prev          move one page
  page <n>             jump to page n
  search <text>        set the free-text filter (back to page 1)
  filter <key>=<value> set a view filter, e.g. tipo=PL,PEC or uf=SP
  clear                drop all filters
  retry                repeat the last request
  quit";

fn render(snapshot: &ListSnapshot<ListItem>, query: &str) {
    match snapshot.status {
        LoadStatus::Idle | LoadStatus::Loading => println!("Carregando..."),
        LoadStatus::Error => {
            println!(
                "Erro: {}",
                snapshot.error.as_deref().unwrap_or("Falha ao carregar dados.")
            );
            println!("(digite 'retry' para tentar novamente)");
        }
        LoadStatus::Success if snapshot.items.is_empty() => {
            println!("Nenhum resultado encontrado.");
        }
        LoadStatus::Success => {
            for item in &snapshot.items {
                println!("- {}  [{}]", item.title, item.href);
                println!("    {}", item.author);
                println!("    {}", item.description);
            }
        }
    }
    println!(
        "Página {} de {}   ?{}",
        snapshot.page, snapshot.total_pages, query
    );
}

/// Merge `key=value` into the current filters; the new pair wins.
fn with_filter<F: ListFilters>(view_query: &str, pair: &str) -> F {
    let merged = if view_query.is_empty() {
        pair.to_string()
    } else {
        format!("{pair}&{view_query}")
    };
    ViewState::<F>::from_query(&merged).filters
}

async fn run<F, T>(view: Arc<ListView<F, T, ListItem>>) -> Result<(), anyhow::Error>
where
    F: ListFilters,
    T: Send + 'static,
{
    view.load().await;
    render(&view.snapshot(), &view.query());
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, arg) = line.split_once(' ').unwrap_or((line, ""));
        let arg = arg.trim();

        let changed = match command {
            "" => continue,
            "q" | "quit" | "exit" => break,
            "help" => {
                println!("{HELP}");
                continue;
            }
            "next" => {
                let snapshot = view.snapshot();
                if snapshot.page >= snapshot.total_pages {
                    println!("Já está na última página.");
                    continue;
                }
                view.set_page(snapshot.page + 1).await
            }
            "prev" => {
                let page = view.state().page;
                if page <= 1 {
                    println!("Já está na primeira página.");
                    continue;
                }
                view.set_page(page - 1).await
            }
            "page" => match arg.parse::<u32>() {
                Ok(page) => view.set_page(page).await,
                Err(_) => {
                    println!("uso: page <n>");
                    continue;
                }
            },
            "search" => view.submit_search(arg).await,
            "filter" if arg.contains('=') => {
                let current = ViewState::new(view.state().filters, 1).to_query();
                let filters = with_filter::<F>(&current, arg);
                view.set_filters(filters).await
            }
            "clear" => view.set_filters(F::default()).await,
            "retry" => view.retry().await,
            _ => {
                println!("comando desconhecido: {line}\n{HELP}");
                continue;
            }
        };

        if !changed {
            println!("(sem alterações)");
        }
        render(&view.snapshot(), &view.query());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let args = Args::parse();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(args.timeout_secs))
        .build()?;
    let client: Arc<dyn CamaraApiClient> = Arc::new(
        HttpCamaraClient::with_client(http, &args.base_url).with_page_size(args.page_size),
    );

    match args.resource {
        Resource::Proposicoes => {
            let source: Arc<dyn PageFetcher<ProposicaoFilters, Proposicao>> =
                Arc::new(ProposicoesSource::new(client));
            let controller = Arc::new(PaginatedController::new(source, proposicao_item));
            run(Arc::new(ListView::from_query(controller, &args.query))).await
        }
        Resource::Deputados => {
            let source: Arc<dyn PageFetcher<DeputadoFilters, Deputado>> =
                Arc::new(DeputadosSource::new(client));
            let controller = Arc::new(PaginatedController::new(source, deputado_item));
            run(Arc::new(ListView::from_query(controller, &args.query))).await
        }
    }
}
