//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or errors. Comparing parsed JSON (not raw
//! strings) avoids false negatives from field-ordering differences.

use petstore_core::multipart::MultipartForm;
use petstore_core::{ApiError, ApiResponse, HttpMethod, HttpRequest, HttpResponse, Pet, PetClient, PetStatus};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> PetClient {
    PetClient::new(BASE_URL)
}

fn load(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated_response(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn assert_request(name: &str, req: &HttpRequest, expected: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
    assert_eq!(req.path, format!("{BASE_URL}{}", expected["path"].as_str().unwrap()), "{name}: path");

    if let Some(headers) = expected.get("headers") {
        let expected_headers: Vec<(String, String)> = headers
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");
    }

    match (expected.get("body"), expected.get("body_text")) {
        (Some(body), _) => {
            let req_body: serde_json::Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(&req_body, body, "{name}: body");
        }
        (None, Some(text)) => {
            let req_body = std::str::from_utf8(req.body.as_deref().unwrap()).unwrap();
            assert_eq!(req_body, text.as_str().unwrap(), "{name}: body text");
        }
        (None, None) => assert!(req.body.is_none(), "{name}: body should be None"),
    }
}

fn assert_expected_error(name: &str, expected_error: &serde_json::Value, err: ApiError) {
    match expected_error.as_str().unwrap() {
        "NotFound" => assert!(matches!(err, ApiError::NotFound), "{name}: expected NotFound"),
        "HttpError" => assert!(matches!(err, ApiError::HttpError { .. }), "{name}: expected HttpError"),
        "DeserializationError" => assert!(
            matches!(err, ApiError::DeserializationError(_)),
            "{name}: expected DeserializationError"
        ),
        other => panic!("{name}: unknown expected_error: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[test]
fn add_pet_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/add_pet.json")) {
        let name = case["name"].as_str().unwrap();
        let input: Pet = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_add_pet(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let pet = c.parse_add_pet(simulated_response(&case)).unwrap();
        let expected: Option<Pet> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(pet, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[test]
fn update_pet_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update_pet.json")) {
        let name = case["name"].as_str().unwrap();
        let input: Pet = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_update_pet(&input).unwrap();
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_update_pet(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_expected_error(name, expected_error, result.unwrap_err());
        } else {
            let expected: Option<Pet> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Get
// ---------------------------------------------------------------------------

#[test]
fn get_pet_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/get_pet.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();

        let req = c.build_get_pet_by_id(id);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_get_pet_by_id(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_expected_error(name, expected_error, result.unwrap_err());
        } else {
            let expected: Pet = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[test]
fn delete_pet_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/delete_pet.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_i64().unwrap();

        let req = c.build_delete_pet(id, None);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_delete_pet(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_expected_error(name, expected_error, result.unwrap_err());
        } else {
            assert!(result.is_ok(), "{name}: expected success");
        }
    }
}

// ---------------------------------------------------------------------------
// Find by status
// ---------------------------------------------------------------------------

#[test]
fn find_by_status_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/find_by_status.json")) {
        let name = case["name"].as_str().unwrap();
        let statuses: Vec<PetStatus> = serde_json::from_value(case["input"].clone()).unwrap();

        let req = c.build_find_pets_by_status(&statuses);
        assert_request(name, &req, &case["expected_request"]);

        let pets = c.parse_find_pets_by_status(simulated_response(&case)).unwrap();
        let expected: Vec<Pet> = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(pets, expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Update with form
// ---------------------------------------------------------------------------

#[test]
fn update_pet_with_form_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/update_pet_with_form.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let status: Option<PetStatus> = serde_json::from_value(input["status"].clone()).unwrap();

        let req = c.build_update_pet_with_form(input["pet_id"].as_i64().unwrap(), input["name"].as_str(), status);
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_update_pet_with_form(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_expected_error(name, expected_error, result.unwrap_err());
        } else {
            let expected: ApiResponse = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Upload
// ---------------------------------------------------------------------------

#[test]
fn upload_file_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/upload_file.json")) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let form = MultipartForm::with_boundary(case["boundary"].as_str().unwrap());

        let req = c.build_upload_file_with_form(
            form,
            input["pet_id"].as_i64().unwrap(),
            input["content_type"].as_str(),
            input["additional_metadata"].as_str(),
            input["file_name"].as_str().unwrap(),
            input["file"].as_str().unwrap().as_bytes(),
        );
        assert_request(name, &req, &case["expected_request"]);

        let result = c.parse_upload_file(simulated_response(&case));
        if let Some(expected_error) = case.get("expected_error") {
            assert_expected_error(name, expected_error, result.unwrap_err());
        } else {
            let expected: ApiResponse = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}
