use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Reduced projection of a recipe, used by search results and bookmark lists.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecipePreview {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl From<&Recipe> for RecipePreview {
    fn from(recipe: &Recipe) -> Self {
        RecipePreview {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            publisher: recipe.publisher.clone(),
            image: recipe.image.clone(),
            key: recipe.key.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Ingredient {
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
}

/// A fully loaded recipe.
///
/// Field names serialize in camelCase; this is also the layout of the
/// persisted bookmarks blob.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub source_url: String,
    pub image: String,
    pub servings: u32,
    pub cooking_time: f64,
    pub ingredients: Vec<Ingredient>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Derived from bookmark membership, recomputed by the store.
    #[serde(default)]
    pub bookmarked: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<RecipePreview>,
    pub page: usize,
    pub results_per_page: usize,
}

impl SearchState {
    pub fn new(results_per_page: usize) -> Self {
        SearchState {
            query: String::new(),
            results: Vec::new(),
            page: 1,
            results_per_page,
        }
    }

    /// `results[(page-1)*rpp .. page*rpp]`, clamped to the available results.
    pub fn page_slice(&self, page: usize) -> &[RecipePreview] {
        let len = self.results.len();
        let start = page
            .saturating_sub(1)
            .saturating_mul(self.results_per_page)
            .min(len);
        let end = page.saturating_mul(self.results_per_page).min(len);
        if start >= end {
            return &[];
        }
        &self.results[start..end]
    }

    pub fn num_pages(&self) -> usize {
        if self.results_per_page == 0 {
            return 0;
        }
        self.results.len().div_ceil(self.results_per_page)
    }
}

/// Bookmarked recipes keyed by id, in insertion order.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Bookmarks {
    entries: Vec<Recipe>,
}

impl Bookmarks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|r| r.id == id)
    }

    /// Appends `recipe` unless its id is already present. Returns whether it was added.
    pub fn add(&mut self, recipe: Recipe) -> bool {
        if self.contains(&recipe.id) {
            return false;
        }
        self.entries.push(recipe);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<Recipe> {
        let idx = self.entries.iter().position(|r| r.id == id)?;
        Some(self.entries.remove(idx))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[Recipe] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn previews(&self) -> Vec<RecipePreview> {
        self.entries.iter().map(RecipePreview::from).collect()
    }
}

impl From<Vec<Recipe>> for Bookmarks {
    fn from(recipes: Vec<Recipe>) -> Self {
        let mut bookmarks = Bookmarks::new();
        for recipe in recipes {
            bookmarks.add(recipe);
        }
        bookmarks
    }
}

// =============================================================================
// Recipe API wire format
// =============================================================================

#[derive(Deserialize, Debug, Clone)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub status: Option<String>,
    pub data: T,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SearchData {
    #[serde(default)]
    pub recipes: Vec<ApiRecipePreview>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct RecipeData {
    pub recipe: ApiRecipe,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApiRecipePreview {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub key: Option<String>,
}

impl From<ApiRecipePreview> for RecipePreview {
    fn from(api: ApiRecipePreview) -> Self {
        RecipePreview {
            id: api.id,
            title: api.title,
            publisher: api.publisher,
            image: api.image_url,
            key: api.key,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ApiRecipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub image_url: String,
    pub servings: u32,
    #[serde(default)]
    pub cooking_time: f64,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub key: Option<String>,
}

impl From<ApiRecipe> for Recipe {
    fn from(api: ApiRecipe) -> Self {
        Recipe {
            id: api.id,
            title: api.title,
            publisher: api.publisher,
            source_url: api.source_url,
            image: api.image_url,
            servings: api.servings,
            cooking_time: api.cooking_time,
            ingredients: api.ingredients,
            key: api.key,
            bookmarked: false,
        }
    }
}

/// Body of a recipe upload request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRecipeUpload {
    pub title: String,
    pub source_url: String,
    pub image_url: String,
    pub publisher: String,
    pub cooking_time: f64,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
}

impl ApiRecipeUpload {
    /// The request body, with the API's snake_case field names.
    pub fn to_json(&self) -> Value {
        json!({
            "title": self.title,
            "source_url": self.source_url,
            "image_url": self.image_url,
            "publisher": self.publisher,
            "cooking_time": self.cooking_time,
            "servings": self.servings,
            "ingredients": self.ingredients,
        })
    }
}
