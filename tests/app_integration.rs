use fxview::AppCommand;
use fxview::cli::compare::CompareOptions;
use fxview::cli::convert::ConvertOptions;
use fxview::cli::history::HistoryOptions;
use fxview::cli::rates::RatesOptions;
use fxview::core::DateRangePreset;
use fxview::core::table::{SortDirection, SortField, SortState};
use std::fs;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LATEST_JSON: &str = r#"{
        "amount": 1.0,
        "base": "USD",
        "date": "2024-05-03",
        "rates": {"EUR": 0.9312, "GBP": 0.7971, "JPY": 152.94}
    }"#;

    const CURRENCIES_JSON: &str = r#"{
        "EUR": "Euro",
        "GBP": "British Pound",
        "JPY": "Japanese Yen",
        "USD": "United States Dollar"
    }"#;

    const HISTORY_JSON: &str = r#"{
        "amount": 1.0,
        "base": "USD",
        "start_date": "2024-04-29",
        "end_date": "2024-05-03",
        "rates": {
            "2024-04-29": {"EUR": 0.9345},
            "2024-04-30": {"EUR": 0.9363},
            "2024-05-02": {"EUR": 0.9331},
            "2024-05-03": {"EUR": 0.9312}
        }
    }"#;

    pub async fn create_mock_server() -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/latest"))
            .and(query_param("from", "USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(LATEST_JSON))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/currencies"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CURRENCIES_JSON))
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path_regex(r"^/\d{4}-\d{2}-\d{2}\.\.\d{4}-\d{2}-\d{2}$"))
            .and(query_param("from", "USD"))
            .and(query_param("to", "EUR"))
            .respond_with(ResponseTemplate::new(200).set_body_string(HISTORY_JSON))
            .mount(&mock_server)
            .await;

        mock_server
    }

    /// Config pointing at the mock server, with retries that fail fast.
    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            base_currency: "USD"
            providers:
              frankfurter:
                base_url: {base_url}
            refresh:
              live_retries: 0
              historical_retries: 0
              retry_base_delay_ms: 1
            adsense:
              client_id: "ca-pub-1234"
              banner_slot: "5678"
        "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let command = AppCommand::Rates(RatesOptions {
        search: "pound".to_string(),
        sort: SortState::new(SortField::Rate, SortDirection::Desc),
        ..RatesOptions::default()
    });
    let result = fxview::run_command(command, config_file.path().to_str()).await;
    assert!(
        result.is_ok(),
        "Rates command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_compare_and_convert_flow_with_mock() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config_path = config_file.path().to_str();

    let compare = AppCommand::Compare(CompareOptions {
        currencies: vec!["eur".to_string(), "JPY".to_string(), "USD".to_string()],
        from: Some("JPY".to_string()),
        ..CompareOptions::default()
    });
    let result = fxview::run_command(compare, config_path).await;
    assert!(result.is_ok(), "Compare failed with: {:?}", result.err());

    let convert = AppCommand::Convert(ConvertOptions {
        amount: 250.0,
        from: "EUR".to_string(),
        to: "GBP".to_string(),
        base: None,
    });
    let result = fxview::run_command(convert, config_path).await;
    assert!(result.is_ok(), "Convert failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_invalid_selections_fail() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config_path = config_file.path().to_str();

    let compare = AppCommand::Compare(CompareOptions {
        currencies: vec!["EUR".to_string(), "EUR".to_string()],
        ..CompareOptions::default()
    });
    let err = fxview::run_command(compare, config_path)
        .await
        .expect_err("duplicate currencies should be rejected");
    assert!(err.to_string().contains("EUR is selected more than once"));

    let compare = AppCommand::Compare(CompareOptions {
        currencies: vec!["EUR".to_string(), "XYZ".to_string()],
        ..CompareOptions::default()
    });
    let err = fxview::run_command(compare, config_path)
        .await
        .expect_err("currency without a rate should be rejected");
    assert!(err.to_string().contains("XYZ is not an available currency"));

    let convert = AppCommand::Convert(ConvertOptions {
        amount: 1.0,
        from: "EUR".to_string(),
        to: "XYZ".to_string(),
        base: None,
    });
    let err = fxview::run_command(convert, config_path)
        .await
        .expect_err("unknown currency should be rejected");
    info!(error = ?err, "Conversion failed as expected");
    assert!(format!("{err:#}").contains("Rate unavailable for currency: XYZ"));
}

#[test_log::test(tokio::test)]
async fn test_history_flow_writes_chart() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let out_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let chart_path = out_dir.path().join("usd-eur.svg");

    let command = AppCommand::History(HistoryOptions {
        base: None,
        target: "eur".to_string(),
        range: DateRangePreset::SevenDays,
        output: Some(chart_path.clone()),
    });
    let result = fxview::run_command(command, config_file.path().to_str()).await;
    assert!(result.is_ok(), "History failed with: {:?}", result.err());

    let svg = fs::read_to_string(&chart_path).expect("Chart should be written");
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("<path d=\"M"));
    assert_eq!(svg.matches("<circle").count(), 4);
}

#[test_log::test(tokio::test)]
async fn test_currencies_flow_and_server_error() {
    let mock_server = test_utils::create_mock_server().await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config_path = config_file.path().to_str();

    let result = fxview::run_command(AppCommand::Currencies, config_path).await;
    assert!(result.is_ok(), "Currencies failed with: {:?}", result.err());

    // No mock for EUR based rates
    let command = AppCommand::Rates(RatesOptions {
        base: Some("EUR".to_string()),
        ..RatesOptions::default()
    });
    let err = fxview::run_command(command, config_path)
        .await
        .expect_err("missing rates should fail");
    assert!(err.to_string().contains("Failed to fetch exchange rates: 404"));
}
