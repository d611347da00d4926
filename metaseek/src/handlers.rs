use crate::engines::{OpenSearchProvider, SearchProvider, YacyProvider};
use anyhow::{Context, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use metaseek_core::pagerank::PageRank;
use metaseek_core::{DomainGraph, RankReport, Tokenizer, VectorSpace, primary_documents};
use metaseek_crawler::{ContentFilter, Crawler, LinkMap};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

// Helper functions shared by the crawl-style handlers

/// Load seed URLs from either a file or a single URL argument
pub fn load_urls_from_source(
    url: Option<&Url>,
    hosts_file: Option<&PathBuf>,
) -> anyhow::Result<Vec<String>> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        Ok(vec![url.as_str().to_string()])
    } else {
        bail!("Either --url, --hosts-file, or --query must be provided")
    }
}

/// Load and parse URLs from a file
pub fn load_urls_from_file(path: &PathBuf) -> anyhow::Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read hosts file {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        bail!("No valid URLs found in {}", path.display());
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if Url::parse(line).is_ok() {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    eprintln!("⚠️  Skipping invalid URL '{}'", line);
    None
}

async fn run_search(sub_matches: &ArgMatches, query: &str) -> anyhow::Result<Vec<String>> {
    let provider = sub_matches
        .get_one::<String>("provider")
        .map(|s| s.as_str())
        .unwrap_or("yacy");
    let limit = *sub_matches.get_one::<usize>("limit").unwrap_or(&20);

    let outcome = match provider {
        "yacy" => {
            let base_url = sub_matches
                .get_one::<String>("search-url")
                .map(|s| s.as_str())
                .unwrap_or("http://localhost:8090");
            YacyProvider::new(base_url).search(query, limit).await?
        }
        "opensearch" => OpenSearchProvider::from_env()?.search(query, limit).await?,
        _ => unreachable!("clap should ensure we don't get here"),
    };

    Ok(outcome.links)
}

async fn gather_seeds(sub_matches: &ArgMatches) -> anyhow::Result<Vec<String>> {
    if let Some(query) = sub_matches.get_one::<String>("query") {
        let seeds = run_search(sub_matches, query).await?;
        if seeds.is_empty() {
            bail!("Search for '{}' returned no links to crawl", query);
        }
        return Ok(seeds);
    }

    let url = sub_matches.get_one::<Url>("url");
    let hosts_file = sub_matches.get_one::<PathBuf>("hosts-file");
    load_urls_from_source(url, hosts_file)
}

fn build_crawler(sub_matches: &ArgMatches) -> Crawler {
    let depth = *sub_matches.get_one::<usize>("depth").unwrap_or(&1);
    let timeout = *sub_matches.get_one::<u64>("timeout").unwrap_or(&10);
    let no_robots = sub_matches.get_flag("no-robots");

    let mut crawler = Crawler::with_timeout(timeout)
        .with_max_depth(depth)
        .with_robots(!no_robots);

    let extra_terms: Vec<String> = sub_matches
        .get_many::<String>("censor")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let extra_extensions: Vec<String> = sub_matches
        .get_many::<String>("skip-extension")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();

    if !extra_terms.is_empty() || !extra_extensions.is_empty() {
        crawler = crawler.with_content_filter(
            ContentFilter::default().extended(extra_terms, extra_extensions),
        );
    }

    crawler
}

fn build_pagerank(sub_matches: &ArgMatches) -> PageRank {
    PageRank::new()
        .with_damping(*sub_matches.get_one::<f64>("damping").unwrap_or(&0.85))
        .with_max_iterations(*sub_matches.get_one::<usize>("iterations").unwrap_or(&100))
        .with_tolerance(*sub_matches.get_one::<f64>("tolerance").unwrap_or(&1e-6))
}

/// Crawl with a spinner reporting worker progress.
async fn execute_crawl(
    crawler: Crawler,
    seeds: &[String],
    threads: usize,
) -> anyhow::Result<LinkMap> {
    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    progress_bar.set_message("Starting crawl...");

    let processed_count = Arc::new(AtomicUsize::new(0));
    let pb_clone = progress_bar.clone();
    let count_clone = processed_count.clone();

    let crawler = crawler.with_progress_callback(Arc::new(move |_worker_id: usize, _url: String| {
        let count = count_clone.fetch_add(1, Ordering::Relaxed) + 1;
        pb_clone.set_message(format!("Crawling... {} URLs processed", count));
        pb_clone.tick();
    }));

    let link_map = crawler
        .crawl(seeds, threads)
        .await
        .context("Crawl failed")?;

    let total = processed_count.load(Ordering::Relaxed);
    progress_bar.finish_with_message(format!("Crawl complete! {} URLs processed", total));

    Ok(link_map)
}

/// Build both rankings from a link map and assemble the report.
fn rank_link_map(
    query: &str,
    link_map: &LinkMap,
    pagerank: &PageRank,
) -> anyhow::Result<RankReport> {
    let tokenizer = Tokenizer::new();

    let docs: Vec<(String, Vec<String>)> = primary_documents(link_map)
        .into_iter()
        .map(|(url, text)| (url, tokenizer.analyze(&text)))
        .collect();

    let mut space = VectorSpace::new();
    space.set_documents(docs);
    let relevance = space.rank(&tokenizer.analyze(query));

    let graph = DomainGraph::from_link_map(link_map);
    let authority = pagerank
        .rank_graph(&graph)
        .context("PageRank configuration error")?;

    Ok(RankReport::build(query, link_map.len(), authority, relevance))
}

fn write_artifact(link_map: &LinkMap, output: Option<&PathBuf>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(link_map).context("Failed to serialize link map")?;

    match output {
        Some(path) => {
            let expanded = shellexpand::tilde(&path.display().to_string()).to_string();
            fs::write(&expanded, json)
                .with_context(|| format!("Failed to write artifact to {}", expanded))?;
            println!("{} Link map written to {}", "✓".green().bold(), expanded);
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn print_report(report: &RankReport, sub_matches: &ArgMatches) -> anyhow::Result<()> {
    let top = *sub_matches.get_one::<usize>("top").unwrap_or(&10);
    if sub_matches.get_flag("json") {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text(top));
    }
    Ok(())
}

// Subcommand handlers

pub async fn handle_search(sub_matches: &ArgMatches) -> anyhow::Result<()> {
    let query = sub_matches
        .get_one::<String>("query")
        .expect("clap enforces --query");

    let links = run_search(sub_matches, query).await?;
    if links.is_empty() {
        println!("No results for '{}'", query);
        return Ok(());
    }

    for link in links {
        println!("{}", link);
    }
    Ok(())
}

pub async fn handle_crawl(sub_matches: &ArgMatches) -> anyhow::Result<()> {
    let seeds = gather_seeds(sub_matches).await?;
    let threads = *sub_matches.get_one::<usize>("threads").unwrap_or(&10);

    println!("\n🕷  Crawling {} seed(s) with {} workers\n", seeds.len(), threads);

    let crawler = build_crawler(sub_matches);
    let link_map = execute_crawl(crawler, &seeds, threads).await?;

    write_artifact(&link_map, sub_matches.get_one::<PathBuf>("output"))
}

pub fn handle_rank(sub_matches: &ArgMatches) -> anyhow::Result<()> {
    let input = sub_matches
        .get_one::<PathBuf>("input")
        .expect("clap enforces --input");
    let query = sub_matches
        .get_one::<String>("query")
        .expect("clap enforces --query");

    let expanded = shellexpand::tilde(&input.display().to_string()).to_string();
    let content = fs::read_to_string(&expanded)
        .with_context(|| format!("Failed to read artifact {}", expanded))?;
    let link_map: LinkMap = serde_json::from_str(&content)
        .with_context(|| format!("{} is not a link-map artifact", expanded))?;

    let report = rank_link_map(query, &link_map, &build_pagerank(sub_matches))?;
    print_report(&report, sub_matches)
}

pub async fn handle_run(sub_matches: &ArgMatches) -> anyhow::Result<()> {
    let query = sub_matches
        .get_one::<String>("query")
        .expect("clap enforces --query")
        .clone();

    let seeds = gather_seeds(sub_matches).await?;
    let threads = *sub_matches.get_one::<usize>("threads").unwrap_or(&10);

    println!("\n🕷  Crawling {} seed(s) with {} workers\n", seeds.len(), threads);

    let crawler = build_crawler(sub_matches);
    let link_map = execute_crawl(crawler, &seeds, threads).await?;

    if let Some(output) = sub_matches.get_one::<PathBuf>("output") {
        write_artifact(&link_map, Some(output))?;
    }

    let report = rank_link_map(&query, &link_map, &build_pagerank(sub_matches))?;
    print_report(&report, sub_matches)
}
