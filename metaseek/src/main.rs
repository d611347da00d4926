use colored::Colorize;
use metaseek::commands::command_argument_builder;
use metaseek::handlers;
use metaseek_core::print_banner;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let quiet = chosen_command.get_flag("quiet");

    // Show banner unless --quiet flag is set
    if !quiet {
        print_banner();
    }

    if chosen_command.subcommand().is_none() {
        // No subcommand provided, just show the banner
        return;
    }

    let outcome = match chosen_command.subcommand() {
        Some(("search", sub_matches)) => handlers::handle_search(sub_matches).await,
        Some(("crawl", sub_matches)) => handlers::handle_crawl(sub_matches).await,
        Some(("rank", sub_matches)) => handlers::handle_rank(sub_matches),
        Some(("run", sub_matches)) => handlers::handle_run(sub_matches).await,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    if let Err(e) = outcome {
        eprintln!("{} {:#}", "✗".red().bold(), e);
        std::process::exit(1);
    }
}
