//! Integration tests for the CSV import pipeline.

mod common;

use crate::common::{
    count_active_facilities, create_test_company, unique_name, ApiClient, TestHarness,
};
use axum::http::StatusCode;
use facility_core::domains::companies::Company;
use facility_core::domains::ingestion::{import_csv, ImportStatus, IngestError};
use test_context::test_context;

#[test_context(TestHarness)]
#[tokio::test]
async fn row_missing_company_name_is_skipped_and_later_rows_still_process(ctx: &TestHarness) {
    let company = unique_name("Skipper");
    let csv = format!(
        "company_name,legend_color,latitude,longitude,address\n\
         ,#FF5733,44.90,-93.20,\"1 First St, Minneapolis, MN 55401\"\n\
         {company},#FF5733,44.91,-93.21,\"2 Second St, Minneapolis, MN 55401\"\n"
    );

    let report = import_csv("facilities.csv", csv.as_bytes(), &ctx.deps()).await.unwrap();

    assert_eq!(report.total_rows, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.skipped_rows[0].row, 2);
    assert!(report.skipped_rows[0].reason.contains("company_name"));
    assert_eq!(report.processed, 1);
    assert_eq!(report.total_facilities, 1);
    assert_eq!(report.status, ImportStatus::Partial);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn undecodable_row_is_skipped_between_good_rows(ctx: &TestHarness) {
    let company = unique_name("Latin1");
    let mut csv = format!(
        "company_name,legend_color,latitude,longitude,address\n\
         {company},#FF5733,44.90,-93.20,\"1 First St, Minneapolis, MN 55401\"\n\
         {company},#FF5733,44.95,-93.25,\"2 Caf"
    )
    .into_bytes();
    csv.push(0xE9);
    csv.extend_from_slice(
        format!(
            " St, Minneapolis, MN 55401\"\n\
             {company},#FF5733,45.00,-93.30,\"3 Third St, Minneapolis, MN 55401\"\n"
        )
        .as_bytes(),
    );

    let report = import_csv("latin1.csv", &csv, &ctx.deps()).await.unwrap();

    assert_eq!(report.total_rows, 3);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.skipped_rows[0].row, 3);
    assert!(report.skipped_rows[0].reason.contains("UTF-8"));
    assert_eq!(report.total_facilities, 2);
    assert_eq!(report.status, ImportStatus::Partial);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn named_color_is_skipped_citing_legend_color(ctx: &TestHarness) {
    let red = unique_name("Red");
    let hex = unique_name("Hex");
    let csv = format!(
        "company,color,lat,lng\n\
         {red},red,44.90,-93.20\n\
         {hex},#FF5733,44.91,-93.21\n"
    );
    let geocoder = ctx.geocoder.clone().with_reverse_place("Minneapolis", "MN");

    let report = import_csv("colors.csv", csv.as_bytes(), &ctx.deps()).await.unwrap();

    assert_eq!(report.skipped, 1);
    assert!(report.skipped_rows[0].reason.contains("legend_color"));
    assert_eq!(report.processed, 1);
    assert_eq!(report.companies.len(), 1);
    assert_eq!(report.companies[0].name, hex);

    let company = Company::find_active_by_name(&hex, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(company.legend_color, "#FF5733");
    assert!(Company::find_active_by_name(&red, &ctx.db_pool).await.unwrap().is_none());

    // Only the accepted row reached the geocoder
    assert_eq!(geocoder.call_count(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn rows_within_duplicate_radius_persist_one_facility(ctx: &TestHarness) {
    let acme = unique_name("Acme");
    // ~33 m apart
    let csv = format!(
        "company_name,legend_color,latitude,longitude,address,tags\n\
         {acme},#FF5733,44.97780,-93.26500,\"100 Main St, Minneapolis, MN 55401\",warehouse\n\
         {acme},#FF5733,44.97810,-93.26500,\"100 Main Street, Minneapolis, MN 55401\",warehouse\n"
    );

    let report = import_csv("acme.csv", csv.as_bytes(), &ctx.deps()).await.unwrap();

    assert_eq!(report.processed, 2);
    assert_eq!(report.total_facilities, 1);
    assert_eq!(report.duplicates, 1);
    assert_eq!(report.status, ImportStatus::Success);
    assert!(report.companies[0].created);
    assert_eq!(report.companies[0].facilities_created, 1);
    assert_eq!(report.companies[0].duplicates, 1);

    let company = Company::find_active_by_name(&acme, &ctx.db_pool).await.unwrap().unwrap();
    assert_eq!(count_active_facilities(&ctx.db_pool, company.id).await.unwrap(), 1);

    // Uploading the same file again changes nothing
    let again = import_csv("acme.csv", csv.as_bytes(), &ctx.deps()).await.unwrap();
    assert_eq!(again.total_facilities, 0);
    assert_eq!(again.duplicates, 2);
    assert!(!again.companies[0].created);
    assert_eq!(count_active_facilities(&ctx.db_pool, company.id).await.unwrap(), 1);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn existing_company_is_matched_by_name_and_color_updated(ctx: &TestHarness) {
    let existing = create_test_company(&ctx.db_pool, "Recolor", "#000000").await.unwrap();
    let address = "500 Lake Ave, Duluth, MN 55802";
    ctx.geocoder.clone().with_address(address, 46.78, -92.10);

    let csv = format!(
        "Company Name,Legend Color,Address\n{},#00FF00,\"{}\"\n",
        existing.name.to_uppercase(),
        address
    );
    let report = import_csv("recolor.csv", csv.as_bytes(), &ctx.deps()).await.unwrap();

    assert_eq!(report.processed, 1);
    let outcome = &report.companies[0];
    assert_eq!(outcome.id, existing.id.to_string());
    assert!(!outcome.created);
    assert!(outcome.color_updated);

    let company = Company::find_by_id(existing.id, &ctx.db_pool).await.unwrap();
    assert_eq!(company.legend_color, "#00FF00");
    assert!(ctx.geocoder.was_geocoded(address));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn geocoding_failure_is_recorded_and_batch_continues(ctx: &TestHarness) {
    let company = unique_name("Geo");
    let good = "1 Good Rd, Duluth, MN 55802";
    ctx.geocoder
        .clone()
        .with_failure("2 Bad Rd, Nowhere, MN 55000", "upstream exploded")
        .with_address(good, 46.70, -92.20);

    let csv = format!(
        "company_name,legend_color,address\n\
         {company},#abc,\"2 Bad Rd, Nowhere, MN 55000\"\n\
         {company},#abc,\"3 Unknown Rd, Nowhere, MN 55000\"\n\
         {company},#abc,\"{good}\"\n"
    );
    let report = import_csv("geo.csv", csv.as_bytes(), &ctx.deps()).await.unwrap();

    assert_eq!(report.failed, 2);
    assert_eq!(report.errors.iter().map(|e| e.row).collect::<Vec<_>>(), vec![2, 3]);
    assert!(report.errors[0].message.contains("upstream exploded"));
    assert_eq!(report.processed, 1);
    assert_eq!(ctx.geocoder.call_count(), 3);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn missing_columns_abort_before_anything_is_written(ctx: &TestHarness) {
    let company = unique_name("Columnless");
    let csv = format!("company_name,address\n{company},\"1 Main St, Duluth, MN\"\n");

    let err = import_csv("bad.csv", csv.as_bytes(), &ctx.deps()).await.unwrap_err();
    let err = err.downcast::<IngestError>().unwrap();
    assert!(matches!(err, IngestError::MissingColumns(ref cols) if cols.len() == 1));

    assert_eq!(ctx.geocoder.call_count(), 0);
    assert!(Company::find_active_by_name(&company, &ctx.db_pool).await.unwrap().is_none());
}

// =============================================================================
// HTTP
// =============================================================================

#[test_context(TestHarness)]
#[tokio::test]
async fn upload_endpoint_imports_and_reports(ctx: &TestHarness) {
    let company = unique_name("Uploaded");
    let csv = format!(
        "company_name,legend_color,latitude,longitude,address,tags\n\
         {company},#3366CC,46.7867,-92.1005,\"1 Harbor Dr, Duluth, MN 55802\",\"port, hazmat\"\n"
    );

    let (status, body) = ctx.api().upload("file", "upload.csv", &csv).await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "success");
    assert_eq!(body["totalRows"], 1);
    assert_eq!(body["totalFacilities"], 1);
    assert_eq!(body["companies"][0]["name"], company);
}

#[test_context(TestHarness)]
#[tokio::test]
async fn upload_endpoint_rejects_bad_files(ctx: &TestHarness) {
    let api = ctx.api();

    let (status, body) = api.upload("file", "data.txt", "company,color,address\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains(".csv"));

    let (status, _) = api.upload("attachment", "data.csv", "company,color,address\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = api.upload("file", "data.csv", "company,address\nA,B\n").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].as_array().unwrap()[0]
        .as_str()
        .unwrap()
        .starts_with("legend_color"));
}

#[test_context(TestHarness)]
#[tokio::test]
async fn upload_endpoint_rejects_oversized_files(ctx: &TestHarness) {
    let mut deps = ctx.deps();
    deps.ingest.max_upload_bytes = 1024;
    let api = ApiClient::new(deps);
    let header = "company_name,legend_color,address\n";

    // Fits the request limit, caught by the file size check
    let mid = format!("{header}{}", "A,#fff,1 Main St\n".repeat(200));
    let (status, body) = api.upload("file", "mid.csv", &mid).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["error"], "File is too large (limit 1024 bytes)");

    // Cut off by the request limit while the field is read
    let huge = format!("{header}{}", "A,#fff,1 Main St\n".repeat(5000));
    let (status, body) = api.upload("file", "huge.csv", &huge).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["error"], "File is too large (limit 1024 bytes)");
}

#[test_context(TestHarness)]
#[tokio::test]
async fn templates_download_as_csv_attachments(ctx: &TestHarness) {
    let api = ctx.api();

    for (path, column) in [("address", "address"), ("coordinates", "latitude")] {
        let request = axum::http::Request::get(format!("/api/upload/templates/{}", path))
            .body(axum::body::Body::empty())
            .unwrap();
        let (status, headers, body) = api.send_raw(request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(headers["content-type"].to_str().unwrap().starts_with("text/csv"));
        assert!(headers["content-disposition"]
            .to_str()
            .unwrap()
            .starts_with("attachment"));
        let body = String::from_utf8(body).unwrap();
        assert!(body.lines().next().unwrap().contains(column));
    }
}
