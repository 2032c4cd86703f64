use anyhow::{Context, Result};

use crate::model::RecipeStore;
use crate::remote::RemoteSource;
use crate::storage::KeyValueStore;
use crate::upload::NewRecipe;
use crate::views::markup::{
    PaginationMarkup, PreviewList, PreviewListMarkup, RecipeMarkup, UploadFormMarkup,
};
use crate::views::{MessageKind, View};

/// The externally visible location fragment, e.g. `#5ed6604591c37cdc054bc886`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    hash: Option<String>,
}

impl Location {
    /// Parse a fragment with or without the leading `#`.
    pub fn from_hash(hash: &str) -> Self {
        let id = hash.trim_start_matches('#');
        Location {
            hash: (!id.is_empty()).then(|| id.to_string()),
        }
    }

    /// The recipe id the location points at.
    pub fn id(&self) -> Option<&str> {
        self.hash.as_deref()
    }

    pub fn push(&mut self, id: &str) {
        self.hash = Some(id.to_string());
    }

    pub fn as_fragment(&self) -> String {
        format!("#{}", self.hash.as_deref().unwrap_or_default())
    }
}

/// Sequences store calls and view updates for each user action.
pub struct App<R, S> {
    pub store: RecipeStore<R, S>,
    pub location: Location,
    pub results_view: View<PreviewListMarkup>,
    pub pagination_view: View<PaginationMarkup>,
    pub recipe_view: View<RecipeMarkup>,
    pub bookmarks_view: View<PreviewListMarkup>,
    pub add_recipe_view: View<UploadFormMarkup>,
}

impl<R, S> App<R, S>
where
    R: RemoteSource,
    S: KeyValueStore,
{
    pub fn new(store: RecipeStore<R, S>) -> Self {
        App {
            store,
            location: Location::default(),
            results_view: View::new("ul", PreviewListMarkup::results()),
            pagination_view: View::new("div", PaginationMarkup),
            recipe_view: View::new("div", RecipeMarkup),
            bookmarks_view: View::new("ul", PreviewListMarkup::bookmarks()),
            add_recipe_view: View::new("form", UploadFormMarkup),
        }
    }

    fn current_page(&mut self, page: Option<usize>) -> PreviewList {
        let active_id = self.location.id().map(str::to_string);
        PreviewList {
            items: self.store.get_results_page(page).to_vec(),
            active_id,
        }
    }

    fn bookmark_list(&self) -> PreviewList {
        PreviewList {
            items: self.store.bookmarks().previews(),
            active_id: self.location.id().map(str::to_string),
        }
    }

    pub async fn control_search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        self.results_view.render_spinner();
        if let Err(e) = self.store.search(query).await {
            log::error!("search '{query}' failed: {e}");
            self.results_view.render_message(MessageKind::Error, None);
            return;
        }

        let page = self.current_page(None);
        self.results_view.render(&page);
        self.pagination_view.render(self.store.search_state());
    }

    pub fn control_pagination(&mut self, goto: usize) {
        let page = self.current_page(Some(goto));
        self.results_view.render(&page);
        self.pagination_view.render(self.store.search_state());
    }

    /// Load whatever recipe the location points at.
    pub async fn control_recipe(&mut self) {
        let Some(id) = self.location.id().map(str::to_string) else {
            return;
        };

        self.recipe_view.render_spinner();

        // re-mark the selected preview; views that show no list yet are skipped
        let page = self.current_page(None);
        if let Err(e) = self.results_view.update(&page) {
            log::debug!("results not updated: {e}");
        }
        let bookmarks = self.bookmark_list();
        if let Err(e) = self.bookmarks_view.update(&bookmarks) {
            log::debug!("bookmarks not updated: {e}");
        }

        match self.store.load_recipe(&id).await {
            Ok(()) => {
                if let Some(recipe) = self.store.recipe() {
                    self.recipe_view.render(recipe);
                }
            }
            Err(e) => {
                log::error!("loading recipe {id} failed: {e}");
                self.recipe_view.render_message(MessageKind::Error, None);
            }
        }
    }

    /// Servings below one are ignored.
    pub fn control_servings(&mut self, new_servings: u32) {
        if new_servings < 1 {
            return;
        }
        self.store.update_servings(new_servings);
        if let Some(recipe) = self.store.recipe() {
            if let Err(e) = self.recipe_view.update(recipe) {
                log::debug!("recipe not updated: {e}");
            }
        }
    }

    /// Toggle the bookmark on the current recipe.
    pub fn control_add_bookmark(&mut self) -> Result<()> {
        let Some(recipe) = self.store.recipe().cloned() else {
            return Ok(());
        };
        if recipe.bookmarked {
            self.store
                .delete_bookmark(&recipe.id)
                .context("Failed to remove bookmark")?;
        } else {
            self.store
                .add_bookmark(&recipe)
                .context("Failed to add bookmark")?;
        }

        if let Some(recipe) = self.store.recipe() {
            if let Err(e) = self.recipe_view.update(recipe) {
                log::debug!("recipe not updated: {e}");
            }
        }
        self.control_bookmarks();
        Ok(())
    }

    pub fn control_bookmarks(&mut self) {
        let bookmarks = self.bookmark_list();
        self.bookmarks_view.render(&bookmarks);
    }

    pub fn control_clear_bookmarks(&mut self) -> Result<()> {
        self.store
            .clear_bookmarks()
            .context("Failed to clear bookmarks")?;
        self.control_bookmarks();
        Ok(())
    }

    /// Show the upload form filled with `form`, e.g. to let the user fix the
    /// values of a rejected upload.
    pub fn control_upload_form(&mut self, form: &NewRecipe) {
        self.add_recipe_view.render(form);
    }

    /// Upload a recipe. Failures are shown in the upload panel with their own
    /// message; returns whether the upload went through.
    pub async fn control_add_recipe(&mut self, form: &NewRecipe) -> bool {
        self.add_recipe_view.render_spinner();

        if let Err(e) = self.store.upload_recipe(form).await {
            log::error!("upload failed: {e}");
            self.add_recipe_view
                .render_message(MessageKind::Error, Some(&e.to_string()));
            return false;
        }

        let Some(recipe) = self.store.recipe() else {
            return false;
        };
        let id = recipe.id.clone();
        self.recipe_view.render(recipe);
        self.add_recipe_view.render_message(MessageKind::Success, None);
        self.location.push(&id);
        self.control_bookmarks();
        true
    }
}
