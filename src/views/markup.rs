use super::{ICONS, MarkupGenerator};
use crate::data_models::{Ingredient, Recipe, RecipePreview, SearchState};
use crate::dom::escape;
use crate::upload::NewRecipe;

/// At most two decimals, trailing zeros dropped: `400`, `0.5`, `0.33`.
pub fn format_number(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        return "0".to_string();
    }
    trimmed.to_string()
}

fn hidden_unless(show: bool) -> &'static str {
    if show { "" } else { " hidden" }
}

// =============================================================================
// Preview lists (search results, bookmarks)
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreviewList {
    pub items: Vec<RecipePreview>,
    /// Id of the recipe currently shown, highlighted in the list.
    pub active_id: Option<String>,
}

pub struct PreviewListMarkup {
    error_message: &'static str,
}

impl PreviewListMarkup {
    pub fn results() -> Self {
        Self {
            error_message: "No recipes found for your search. Please try again!",
        }
    }

    pub fn bookmarks() -> Self {
        Self {
            error_message: "No bookmarks yet. Find a nice recipe and bookmark it :)",
        }
    }

    fn preview(item: &RecipePreview, active: bool) -> String {
        let id = escape(&item.id);
        let title = escape(&item.title);
        format!(
            concat!(
                r#"<li class="preview">"#,
                r##"<a class="preview__link{active}" href="#{id}">"##,
                r#"<figure class="preview__fig"><img src="{image}" alt="{title}"></figure>"#,
                r#"<div class="preview__data">"#,
                r#"<h4 class="preview__title">{title}</h4>"#,
                r#"<p class="preview__publisher">{publisher}</p>"#,
                r#"<div class="preview__user-generated{hidden}"><svg><use href="{icons}#icon-user"></use></svg></div>"#,
                r#"</div></a></li>"#,
            ),
            active = if active { " preview__link--active" } else { "" },
            id = id,
            image = escape(&item.image),
            title = title,
            publisher = escape(&item.publisher),
            hidden = hidden_unless(item.key.is_some()),
            icons = ICONS,
        )
    }
}

impl MarkupGenerator for PreviewListMarkup {
    type Data = PreviewList;

    fn generate(&self, data: &PreviewList) -> String {
        data.items
            .iter()
            .map(|item| Self::preview(item, data.active_id.as_deref() == Some(item.id.as_str())))
            .collect()
    }

    fn is_empty(&self, data: &PreviewList) -> bool {
        data.items.is_empty()
    }

    fn error_message(&self) -> &str {
        self.error_message
    }
}

// =============================================================================
// Pagination
// =============================================================================

pub struct PaginationMarkup;

impl PaginationMarkup {
    fn button(direction: &str, arrow: &str, goto: usize) -> String {
        format!(
            concat!(
                r#"<button data-goto="{goto}" class="btn--inline pagination__btn--{direction}">"#,
                r#"<svg class="search__icon"><use href="{icons}#icon-arrow-{arrow}"></use></svg>"#,
                r#"<span>Page {goto}</span></button>"#,
            ),
            goto = goto,
            direction = direction,
            arrow = arrow,
            icons = ICONS,
        )
    }
}

impl MarkupGenerator for PaginationMarkup {
    type Data = SearchState;

    fn generate(&self, search: &SearchState) -> String {
        let page = search.page;
        let num_pages = search.num_pages();
        let prev = (page > 1 && page <= num_pages).then(|| Self::button("prev", "left", page - 1));
        let next = (page < num_pages).then(|| Self::button("next", "right", page + 1));
        [prev, next].into_iter().flatten().collect()
    }

    fn error_message(&self) -> &str {
        "No pages to show."
    }
}

// =============================================================================
// Recipe details
// =============================================================================

pub struct RecipeMarkup;

impl RecipeMarkup {
    fn ingredient(ing: &Ingredient) -> String {
        format!(
            concat!(
                r#"<li class="recipe__ingredient">"#,
                r#"<svg class="recipe__icon"><use href="{icons}#icon-check"></use></svg>"#,
                r#"<div class="recipe__quantity">{quantity}</div>"#,
                r#"<div class="recipe__description"><span class="recipe__unit">{unit}</span> {description}</div>"#,
                r#"</li>"#,
            ),
            icons = ICONS,
            quantity = ing.quantity.map(format_number).unwrap_or_default(),
            unit = escape(&ing.unit),
            description = escape(&ing.description),
        )
    }
}

impl MarkupGenerator for RecipeMarkup {
    type Data = Recipe;

    fn generate(&self, recipe: &Recipe) -> String {
        let ingredients: String = recipe.ingredients.iter().map(Self::ingredient).collect();
        format!(
            concat!(
                r#"<figure class="recipe__fig"><img src="{image}" alt="{title}" class="recipe__img">"#,
                r#"<h1 class="recipe__title"><span>{title}</span></h1></figure>"#,
                r#"<div class="recipe__details">"#,
                r#"<div class="recipe__info">"#,
                r#"<svg class="recipe__info-icon"><use href="{icons}#icon-clock"></use></svg>"#,
                r#"<span class="recipe__info-data recipe__info-data--minutes">{minutes}</span>"#,
                r#"<span class="recipe__info-text">minutes</span></div>"#,
                r#"<div class="recipe__info">"#,
                r#"<svg class="recipe__info-icon"><use href="{icons}#icon-users"></use></svg>"#,
                r#"<span class="recipe__info-data recipe__info-data--people">{servings}</span>"#,
                r#"<span class="recipe__info-text">servings</span>"#,
                r#"<div class="recipe__info-buttons">"#,
                r#"<button class="btn--tiny btn--update-servings" data-update-to="{fewer}"><svg><use href="{icons}#icon-minus-circle"></use></svg></button>"#,
                r#"<button class="btn--tiny btn--update-servings" data-update-to="{more}"><svg><use href="{icons}#icon-plus-circle"></use></svg></button>"#,
                r#"</div></div>"#,
                r#"<div class="recipe__user-generated{hidden}"><svg><use href="{icons}#icon-user"></use></svg></div>"#,
                r#"<button class="btn--round btn--bookmark"><svg><use href="{icons}#icon-bookmark{fill}"></use></svg></button>"#,
                r#"</div>"#,
                r#"<div class="recipe__ingredients"><h2 class="heading--2">Recipe ingredients</h2>"#,
                r#"<ul class="recipe__ingredient-list">{ingredients}</ul></div>"#,
                r#"<div class="recipe__directions"><h2 class="heading--2">How to cook it</h2>"#,
                r#"<p class="recipe__directions-text">This recipe was carefully designed and tested by "#,
                r#"<span class="recipe__publisher">{publisher}</span>. Please check out directions at their website.</p>"#,
                r#"<a class="btn--small recipe__btn" href="{source}" target="_blank"><span>Directions</span></a>"#,
                r#"</div>"#,
            ),
            image = escape(&recipe.image),
            title = escape(&recipe.title),
            icons = ICONS,
            minutes = format_number(recipe.cooking_time),
            servings = recipe.servings,
            fewer = recipe.servings.saturating_sub(1),
            more = recipe.servings.saturating_add(1),
            hidden = hidden_unless(recipe.key.is_some()),
            fill = if recipe.bookmarked { "-fill" } else { "" },
            ingredients = ingredients,
            publisher = escape(&recipe.publisher),
            source = escape(&recipe.source_url),
        )
    }

    fn error_message(&self) -> &str {
        "We could not find that recipe. Please try another one!"
    }
}

// =============================================================================
// Upload form
// =============================================================================

pub struct UploadFormMarkup;

impl UploadFormMarkup {
    fn input(label: &str, name: &str, value: &str) -> String {
        format!(
            r#"<label>{label}</label><input value="{value}" required name="{name}" type="text">"#,
            label = escape(label),
            value = escape(value),
            name = name,
        )
    }
}

impl MarkupGenerator for UploadFormMarkup {
    type Data = NewRecipe;

    fn generate(&self, form: &NewRecipe) -> String {
        let data = [
            Self::input("Title", "title", &form.title),
            Self::input("URL", "sourceUrl", &form.source_url),
            Self::input("Image URL", "image", &form.image),
            Self::input("Publisher", "publisher", &form.publisher),
            Self::input("Prep time", "cookingTime", &form.cooking_time),
            Self::input("Servings", "servings", &form.servings),
        ]
        .concat();
        let ingredients: String = form
            .ingredients
            .iter()
            .enumerate()
            .map(|(i, line)| {
                format!(
                    r#"<label>Ingredient {n}</label><input value="{value}" type="text" name="ingredient-{n}" placeholder="Format: 'Quantity,Unit,Description'">"#,
                    n = i + 1,
                    value = escape(line),
                )
            })
            .collect();
        format!(
            concat!(
                r#"<div class="upload__column"><h3 class="upload__heading">Recipe data</h3>{data}</div>"#,
                r#"<div class="upload__column"><h3 class="upload__heading">Ingredients</h3>{ingredients}</div>"#,
                r#"<button class="btn upload__btn"><svg><use href="{icons}#icon-upload-cloud"></use></svg><span>Upload</span></button>"#,
            ),
            data = data,
            ingredients = ingredients,
            icons = ICONS,
        )
    }

    fn error_message(&self) -> &str {
        "Failed to upload recipe. Please try again."
    }

    fn success_message(&self) -> &str {
        "Recipe was successfully uploaded :)"
    }
}
