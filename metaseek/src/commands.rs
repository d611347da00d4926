use crate::CLAP_STYLING;
use clap::{arg, command};
use url::Url;

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("metaseek")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("metaseek")
        .styles(CLAP_STYLING)
        .arg(arg!(-q --"quiet" "Suppress banner and non-essential output").required(false))
        .subcommand_required(false)
        .subcommand(
            command!("search")
                .about("Query a search provider and print the result URLs it returns")
                .arg(
                    arg!(-Q --"query" <QUERY>)
                        .required(true)
                        .help("The search query"),
                )
                .args(provider_args()),
        )
        .subcommand(
            command!("crawl")
                .about(
                    "Crawl outward from seed URLs, following only cross-domain links, and \
                write the link-map artifact.",
                )
                .arg(
                    arg!(-u --"url" <URL>)
                        .required(false)
                        .help("A single seed URL to crawl")
                        .value_parser(clap::value_parser!(Url))
                        .conflicts_with_all(["hosts-file", "query"]),
                )
                .arg(
                    arg!(-H --"hosts-file" <PATH>)
                        .required(false)
                        .help("Path to a newline-delimited file of seed URLs")
                        .value_parser(clap::value_parser!(std::path::PathBuf))
                        .conflicts_with_all(["url", "query"]),
                )
                .arg(
                    arg!(-Q --"query" <QUERY>)
                        .required(false)
                        .help("Take seeds from a search provider instead of explicit URLs")
                        .conflicts_with_all(["url", "hosts-file"]),
                )
                .args(provider_args())
                .args(crawl_args())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Write the link-map artifact to a file (default: stdout)")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                ),
        )
        .subcommand(
            command!("rank")
                .about(
                    "Rank a crawled link-map artifact: domain authority by PageRank and \
                page relevance by TF-IDF cosine similarity.",
                )
                .arg(
                    arg!(-i --"input" <PATH>)
                        .required(true)
                        .help("Path to a link-map artifact produced by crawl")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .arg(
                    arg!(-Q --"query" <QUERY>)
                        .required(true)
                        .help("The relevance query"),
                )
                .args(rank_args()),
        )
        .subcommand(
            command!("run")
                .about("The full pipeline: search for seeds, crawl them, rank the results.")
                .arg(
                    arg!(-Q --"query" <QUERY>)
                        .required(true)
                        .help("The search and relevance query"),
                )
                .args(provider_args())
                .args(crawl_args())
                .arg(
                    arg!(-o --"output" <PATH>)
                        .required(false)
                        .help("Also write the link-map artifact to a file")
                        .value_parser(clap::value_parser!(std::path::PathBuf)),
                )
                .args(rank_args()),
        )
}

fn provider_args() -> Vec<clap::Arg> {
    vec![
        arg!(--"provider" <PROVIDER>)
            .required(false)
            .help("Search provider to take seeds from")
            .value_parser(["yacy", "opensearch"])
            .default_value("yacy"),
        arg!(--"search-url" <URL>)
            .required(false)
            .help("Base URL of the YaCy peer")
            .default_value("http://localhost:8090"),
        arg!(--"limit" <N>)
            .required(false)
            .help("Maximum number of search results to seed from")
            .value_parser(clap::value_parser!(usize))
            .default_value("20"),
    ]
}

fn crawl_args() -> Vec<clap::Arg> {
    vec![
        arg!(-t --"threads" <NUM_WORKERS>)
            .required(false)
            .help("The number of async worker 'threads' in the worker pool.")
            .value_parser(clap::value_parser!(usize))
            .default_value("10"),
        arg!(-d --"depth" <DEPTH>)
            .required(false)
            .help("Maximum crawl depth; 0 crawls only the seeds")
            .value_parser(clap::value_parser!(usize))
            .default_value("1"),
        arg!(--"timeout" <SECONDS>)
            .required(false)
            .help("Per-fetch timeout in seconds")
            .value_parser(clap::value_parser!(u64))
            .default_value("10"),
        arg!(--"no-robots")
            .required(false)
            .help("Skip robots.txt enforcement (on by default)")
            .action(clap::ArgAction::SetTrue),
        arg!(--"censor" <TERM>)
            .required(false)
            .help("Additional censored term; URLs containing it are skipped (repeatable)")
            .action(clap::ArgAction::Append),
        arg!(--"skip-extension" <EXT>)
            .required(false)
            .help("Additional path extension to skip, e.g. .svg (repeatable)")
            .action(clap::ArgAction::Append),
    ]
}

fn rank_args() -> Vec<clap::Arg> {
    vec![
        arg!(--"top" <N>)
            .required(false)
            .help("How many ranked entries to print")
            .value_parser(clap::value_parser!(usize))
            .default_value("10"),
        arg!(--"json")
            .required(false)
            .help("Emit the report as JSON instead of text")
            .action(clap::ArgAction::SetTrue),
        arg!(--"damping" <FACTOR>)
            .required(false)
            .help("PageRank teleportation weight in [0,1]")
            .value_parser(clap::value_parser!(f64))
            .default_value("0.85"),
        arg!(--"iterations" <N>)
            .required(false)
            .help("PageRank maximum iterations")
            .value_parser(clap::value_parser!(usize))
            .default_value("100"),
        arg!(--"tolerance" <EPS>)
            .required(false)
            .help("PageRank convergence tolerance")
            .value_parser(clap::value_parser!(f64))
            .default_value("1e-6"),
    ]
}
