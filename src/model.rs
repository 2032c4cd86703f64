use anyhow::Context;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::Config;
use crate::data_models::{
    ApiResponse, Bookmarks, Ingredient, Recipe, RecipeData, RecipePreview, SearchData,
    SearchState,
};
use crate::error::{RemoteError, StoreResult};
use crate::remote::RemoteSource;
use crate::storage::{BookmarkRepo, KeyValueStore};
use crate::upload::NewRecipe;

/// Where the recipe API lives and how results are paged.
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub api_url: Url,
    pub api_key: Option<String>,
    pub results_per_page: usize,
}

impl StoreSettings {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_url = Url::parse(&config.api_url)
            .with_context(|| format!("Invalid recipe API url: {}", config.api_url))?;
        Ok(Self {
            api_url,
            api_key: config.api_key.clone(),
            results_per_page: config.results_per_page,
        })
    }
}

/// Everything the application knows. Views only ever see it by shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    pub search: SearchState,
    pub recipe: Option<Recipe>,
    pub bookmarks: Bookmarks,
}

/// The application state store.
///
/// Owns search results, the current recipe and the bookmarks. Remote calls go
/// through `R`, bookmark durability through `S`. All mutation happens through
/// `&mut self`, so there is exactly one writer at a time.
pub struct RecipeStore<R, S> {
    remote: R,
    bookmark_repo: BookmarkRepo<S>,
    settings: StoreSettings,
    state: State,
}

impl<R, S> RecipeStore<R, S>
where
    R: RemoteSource,
    S: KeyValueStore,
{
    /// Build a store and load persisted bookmarks once. No persisted
    /// bookmarks means an empty collection.
    pub fn new(remote: R, storage: S, settings: StoreSettings) -> StoreResult<Self> {
        let bookmark_repo = BookmarkRepo::new(storage);
        let bookmarks = bookmark_repo.load()?;
        Ok(Self {
            remote,
            bookmark_repo,
            state: State {
                search: SearchState::new(settings.results_per_page),
                recipe: None,
                bookmarks,
            },
            settings,
        })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn search_state(&self) -> &SearchState {
        &self.state.search
    }

    pub fn recipe(&self) -> Option<&Recipe> {
        self.state.recipe.as_ref()
    }

    pub fn bookmarks(&self) -> &Bookmarks {
        &self.state.bookmarks
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    /// Run a search and replace the results wholesale. The page goes back to 1.
    pub async fn search(&mut self, query: &str) -> StoreResult<()> {
        let url = self.endpoint(None, &[("search", query)]);
        let data: SearchData = decode(self.remote.fetch_json(url).await?)?;

        self.state.search.query = query.to_string();
        self.state.search.page = 1;
        self.state.search.results = data.recipes.into_iter().map(RecipePreview::from).collect();
        log::info!(
            "search '{query}' returned {} result(s)",
            self.state.search.results.len()
        );
        Ok(())
    }

    /// Move to `page` (or stay on the current one) and return its slice of
    /// results. Pages past the end, and page 0, are empty; the stored page
    /// never drops below 1.
    pub fn get_results_page(&mut self, page: Option<usize>) -> &[RecipePreview] {
        let page = page.unwrap_or(self.state.search.page);
        self.state.search.page = page.max(1);
        self.state.search.page_slice(page)
    }

    /// Load a recipe, replacing the current one.
    pub async fn load_recipe(&mut self, id: &str) -> StoreResult<()> {
        let url = self.endpoint(Some(id), &[]);
        let data: RecipeData = decode(self.remote.fetch_json(url).await?)?;

        let mut recipe = Recipe::from(data.recipe);
        recipe.bookmarked = self.state.bookmarks.contains(&recipe.id);
        log::info!("loaded recipe {} (bookmarked: {})", recipe.id, recipe.bookmarked);
        self.state.recipe = Some(recipe);
        Ok(())
    }

    /// Rescale every ingredient to `new_servings`.
    ///
    /// Precondition: both the current and the new servings are positive.
    /// Callers validate user input before getting here.
    pub fn update_servings(&mut self, new_servings: u32) {
        let Some(recipe) = self.state.recipe.as_mut() else {
            log::warn!("update_servings called without a loaded recipe");
            return;
        };
        let old_servings = recipe.servings;
        debug_assert!(old_servings > 0, "recipe has non-positive servings");
        debug_assert!(new_servings > 0, "new servings must be positive");

        // compute the whole list before swapping it in
        let scaled: Vec<Ingredient> = recipe
            .ingredients
            .iter()
            .map(|ing| Ingredient {
                quantity: ing
                    .quantity
                    .map(|q| q / f64::from(old_servings) * f64::from(new_servings)),
                ..ing.clone()
            })
            .collect();
        recipe.ingredients = scaled;
        recipe.servings = new_servings;
        log::debug!("servings {old_servings} -> {new_servings} for {}", recipe.id);
    }

    pub fn add_bookmark(&mut self, recipe: &Recipe) -> StoreResult<()> {
        let mut entry = recipe.clone();
        entry.bookmarked = true;
        if !self.state.bookmarks.add(entry) {
            log::debug!("recipe {} is already bookmarked", recipe.id);
        }

        if let Some(current) = self.state.recipe.as_mut() {
            if current.id == recipe.id {
                current.bookmarked = true;
            }
        }

        log::info!("bookmarked recipe {}", recipe.id);
        self.persist_bookmarks()
    }

    pub fn delete_bookmark(&mut self, id: &str) -> StoreResult<()> {
        if self.state.bookmarks.remove(id).is_none() {
            log::debug!("recipe {id} was not bookmarked");
        }

        if let Some(current) = self.state.recipe.as_mut() {
            if current.id == id {
                current.bookmarked = false;
            }
        }

        log::info!("removed bookmark {id}");
        self.persist_bookmarks()
    }

    /// Drop every bookmark and the persisted blob.
    pub fn clear_bookmarks(&mut self) -> StoreResult<()> {
        self.state.bookmarks.clear();
        if let Some(current) = self.state.recipe.as_mut() {
            current.bookmarked = false;
        }
        self.bookmark_repo.clear()?;
        log::info!("cleared all bookmarks");
        Ok(())
    }

    /// Validate and upload a new recipe, make it the current recipe and
    /// bookmark it. Nothing changes if validation or the request fails.
    pub async fn upload_recipe(&mut self, form: &NewRecipe) -> StoreResult<()> {
        let body = form.to_payload()?.to_json();

        let url = self.endpoint(None, &[]);
        let data: RecipeData = decode(self.remote.send_json(url, body).await?)?;

        let recipe = Recipe::from(data.recipe);
        log::info!("uploaded recipe {} '{}'", recipe.id, recipe.title);
        self.state.recipe = Some(recipe.clone());
        self.add_bookmark(&recipe)
    }

    fn persist_bookmarks(&self) -> StoreResult<()> {
        self.bookmark_repo.save(&self.state.bookmarks)?;
        Ok(())
    }

    /// `{api}[/{id}]?{query}&key={key}`
    fn endpoint(&self, id: Option<&str>, query: &[(&str, &str)]) -> Url {
        let mut url = self.settings.api_url.clone();
        if let Some(id) = id {
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(id);
            }
        }

        let mut pairs: Vec<(&str, &str)> = query.to_vec();
        if let Some(key) = self.settings.api_key.as_deref() {
            pairs.push(("key", key));
        }
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        url
    }
}

/// Unwrap the `{ data: ... }` envelope of an API response.
fn decode<T: DeserializeOwned>(value: Value) -> Result<T, RemoteError> {
    serde_json::from_value::<ApiResponse<T>>(value)
        .map(|res| res.data)
        .map_err(|e| RemoteError::Decode(e.to_string()))
}
