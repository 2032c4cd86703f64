#![allow(dead_code)]

use reqwest::Url;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

use forkify::error::RemoteError;
use forkify::model::{RecipeStore, StoreSettings};
use forkify::remote::RemoteSource;
use forkify::storage::MemoryStorage;

pub const API_URL: &str = "https://forkify.test/api/v2/recipes";

#[derive(Debug, Clone)]
pub struct Request {
    pub method: &'static str,
    pub url: Url,
    pub body: Option<Value>,
}

/// Answers requests from a queue of canned responses and records them.
#[derive(Default)]
pub struct ScriptedRemote {
    responses: Mutex<VecDeque<Result<Value, RemoteError>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(responses: impl IntoIterator<Item = Result<Value, RemoteError>>) -> Self {
        let remote = Self::new();
        remote.responses.lock().unwrap().extend(responses);
        remote
    }

    pub fn push(&self, response: Result<Value, RemoteError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    fn answer(&self, request: Request) -> Result<Value, RemoteError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(RemoteError::Transport("no scripted response".into())))
    }
}

impl RemoteSource for ScriptedRemote {
    async fn fetch_json(&self, url: Url) -> Result<Value, RemoteError> {
        self.answer(Request {
            method: "GET",
            url,
            body: None,
        })
    }

    async fn send_json(&self, url: Url, payload: Value) -> Result<Value, RemoteError> {
        self.answer(Request {
            method: "POST",
            url,
            body: Some(payload),
        })
    }
}

pub fn settings() -> StoreSettings {
    StoreSettings {
        api_url: Url::parse(API_URL).unwrap(),
        api_key: Some("test-key".to_string()),
        results_per_page: 10,
    }
}

pub fn new_store(
    remote: ScriptedRemote,
    storage: MemoryStorage,
) -> RecipeStore<ScriptedRemote, MemoryStorage> {
    RecipeStore::new(remote, storage, settings()).unwrap()
}

pub fn search_response(count: usize) -> Value {
    let recipes: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "id": format!("r{i}"),
                "title": format!("Pizza {i}"),
                "publisher": "Closet Cooking",
                "image_url": format!("https://img.test/{i}.jpg"),
            })
        })
        .collect();
    json!({ "status": "success", "results": count, "data": { "recipes": recipes } })
}

pub fn recipe_json(id: &str, servings: u32, ingredients: Value) -> Value {
    json!({
        "id": id,
        "title": format!("Recipe {id}"),
        "publisher": "The Pioneer Woman",
        "source_url": format!("https://source.test/{id}"),
        "image_url": format!("https://img.test/{id}.jpg"),
        "servings": servings,
        "cooking_time": 45,
        "ingredients": ingredients,
    })
}

pub fn recipe_response(id: &str, servings: u32, ingredients: Value) -> Value {
    json!({ "status": "success", "data": { "recipe": recipe_json(id, servings, ingredients) } })
}

pub fn flour_recipe(id: &str) -> Value {
    recipe_response(
        id,
        4,
        json!([
            { "quantity": 200, "unit": "g", "description": "flour" },
            { "quantity": 1.5, "unit": "tsp", "description": "salt" },
            { "quantity": null, "unit": "", "description": "Olive oil" },
        ]),
    )
}
