//! Integration tests for doi-fill
//!
//! These tests run the whole pipeline (read, lookup over HTTP, write)
//! against a local mockito server standing in for CrossRef.

use doi_fill::bib::{output_path, parse_bibliography, read_bibliography, render_entry};
use doi_fill::config::LookupConfig;
use doi_fill::enrich::{enrich_file, EnrichError, EnrichOptions};
use doi_fill::sources::{CrossRefResolver, DoiResolver, LookupError};
use doi_fill::Query;
use mockito::Matcher;
use std::path::Path;

const INPUT: &str = r#"@string{acm = "ACM Press"}

@article{knuth1984,
    author = {Knuth, Donald E.},
    title = {Literate Programming},
    journal = {The Computer Journal},
    year = {1984},
    doi = {10.1093/comjnl/27.2.97}
}

@conference{dean2004,
    Author = {Dean, Jeffrey and Ghemawat, Sanjay},
    title = {MapReduce: Simplified Data Processing on Large Clusters},
    booktitle = {OSDI~'04},
    publisher = acm,
    pages = {137--150},
    month = dec,
    year = 2004,
    doi = {}
}

@book{anon1790,
    title = {Pamphlet on M{\"u}ller's {\'E}cole and $\alpha$-Rays},
    note = "Printed~in Paris",
    year = {1790}
}
"#;

const MAPREDUCE_TITLE: &str = "MapReduce: Simplified Data Processing on Large Clusters";
const MAPREDUCE_DOI: &str = "10.1145/1327452.1327492";

fn works_body(doi: &str) -> String {
    format!(
        r#"{{"status":"ok","message-type":"work-list","message":{{"total-results":1,"items":[{{"DOI":"{}","title":["x"]}}]}}}}"#,
        doi
    )
}

fn resolver(base_url: &str, max_attempts: u32) -> CrossRefResolver {
    let config = LookupConfig {
        base_url: base_url.to_string(),
        max_attempts,
        retry_delay_ms: 0,
        timeout_secs: 5,
        ..LookupConfig::default()
    };
    CrossRefResolver::from_config(&config).unwrap()
}

fn write_input(dir: &Path) -> std::path::PathBuf {
    let input = dir.join("refs.bib");
    std::fs::write(&input, INPUT).unwrap();
    input
}

#[tokio::test]
async fn test_end_to_end_fills_missing_doi() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/works")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query.title".into(), MAPREDUCE_TITLE.into()),
            Matcher::UrlEncoded(
                "query.author".into(),
                "Dean, Jeffrey and Ghemawat, Sanjay".into(),
            ),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(works_body(MAPREDUCE_DOI))
        .expect(1)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = output_path(&input, "_doi.bib");
    assert!(output.ends_with("refs.bib_doi.bib"));

    let summary = enrich_file(
        &input,
        &output,
        &resolver(&server.url(), 4),
        &EnrichOptions::default(),
    )
    .await
    .unwrap();

    mock.assert_async().await;
    assert_eq!(summary.new, 1);
    assert_eq!(summary.before, 1);
    assert_eq!(summary.total, 3);
    assert_eq!(summary.skipped, 1);

    // only the blank DOI changes; every other byte is written back as read
    let expected = INPUT.replace(
        "    doi = {}\n",
        "    doi = {10.1145/1327452.1327492}\n",
    );
    assert_eq!(std::fs::read_to_string(&output).unwrap(), expected);

    let written = read_bibliography(&output).unwrap();
    let keys: Vec<&str> = written.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["knuth1984", "dean2004", "anon1790"]);
    assert_eq!(written.get("dean2004").unwrap().doi(), Some(MAPREDUCE_DOI));
}

#[tokio::test]
async fn test_repeated_citation_keys_are_kept() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/works")
        .match_query(Matcher::UrlEncoded("query.title".into(), "Second".into()))
        .with_status(200)
        .with_body(works_body("10.1/second"))
        .expect(1)
        .create_async()
        .await;

    let input_text = "@article{dup,\n    author = {Roe, Jane},\n    title = {First},\n    doi = {10.1/first}\n}\n\n@article{dup,\n    author = {Roe, Jane},\n    title = {Second}\n}\n";
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("dup.bib");
    let output = dir.path().join("dup_out.bib");
    std::fs::write(&input, input_text).unwrap();

    let summary = enrich_file(
        &input,
        &output,
        &resolver(&server.url(), 1),
        &EnrichOptions::default(),
    )
    .await
    .unwrap();

    mock.assert_async().await;
    assert_eq!(summary.total, 2);
    assert_eq!(summary.before, 1);
    assert_eq!(summary.new, 1);
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        input_text.replace(
            "    title = {Second}\n",
            "    title = {Second},\n    doi = {10.1/second}\n"
        )
    );
}

#[tokio::test]
async fn test_end_to_end_is_idempotent() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/works")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(works_body(MAPREDUCE_DOI))
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let first = dir.path().join("first.bib");
    let second = dir.path().join("second.bib");
    let resolver = resolver(&server.url(), 4);

    enrich_file(&input, &first, &resolver, &EnrichOptions::default())
        .await
        .unwrap();
    enrich_file(&input, &second, &resolver, &EnrichOptions::default())
        .await
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&second).unwrap()
    );

    // a second pass over the output has nothing left to resolve
    let third = dir.path().join("third.bib");
    let summary = enrich_file(&first, &third, &resolver, &EnrichOptions::default())
        .await
        .unwrap();
    assert_eq!(summary.new, 0);
    assert_eq!(summary.before, 2);
    assert_eq!(
        std::fs::read_to_string(&first).unwrap(),
        std::fs::read_to_string(&third).unwrap()
    );
}

#[tokio::test]
async fn test_non_success_status_is_retried_until_exhausted() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/works")
        .match_query(Matcher::Any)
        .with_status(503)
        .expect(3)
        .create_async()
        .await;

    let result = resolver(&server.url(), 3)
        .lookup(&Query::new(MAPREDUCE_TITLE, "Dean, Jeffrey"))
        .await;

    mock.assert_async().await;
    assert!(matches!(result, Err(LookupError::Exhausted { attempts: 3 })));
}

#[tokio::test]
async fn test_malformed_response_is_not_retried() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/works")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"status":"ok","message":{"items":[]}}"#)
        .expect(1)
        .create_async()
        .await;

    let result = resolver(&server.url(), 4)
        .lookup(&Query::new(MAPREDUCE_TITLE, "Dean, Jeffrey"))
        .await;

    mock.assert_async().await;
    assert!(matches!(result, Err(LookupError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_failed_lookup_still_writes_output() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/works")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("out.bib");

    let summary = enrich_file(
        &input,
        &output,
        &resolver(&server.url(), 2),
        &EnrichOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(summary.new, 0);
    assert_eq!(summary.failed, 1);
    assert!(!read_bibliography(&output)
        .unwrap()
        .get("dean2004")
        .unwrap()
        .has_doi());
}

#[tokio::test]
async fn test_transport_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_input(dir.path());
    let output = dir.path().join("out.bib");

    // nothing listens on port 1
    let result = enrich_file(
        &input,
        &output,
        &resolver("http://127.0.0.1:1", 4),
        &EnrichOptions::default(),
    )
    .await;

    assert!(matches!(
        result,
        Err(EnrichError::Lookup(LookupError::Transport(_)))
    ));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_missing_input_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = enrich_file(
        &dir.path().join("absent.bib"),
        &dir.path().join("out.bib"),
        &resolver("http://127.0.0.1:1", 1),
        &EnrichOptions::default(),
    )
    .await;

    assert!(matches!(result, Err(EnrichError::Bib(_))));
}

#[test]
fn test_rendered_entry_matches_source_text() {
    let bib = parse_bibliography(INPUT).unwrap();
    let rendered = render_entry(bib.get("anon1790").unwrap(), "    ");
    let start = INPUT.find("@book{anon1790").unwrap();
    assert_eq!(rendered, &INPUT[start..]);
}
