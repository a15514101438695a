use prep_core::model::CourseSummary;

#[derive(Clone, Debug, PartialEq)]
pub struct CategoryBarVm {
    pub name: String,
    pub percent_label: String,
    pub width_style: String,
}

#[must_use]
pub fn map_category_bars(summary: &CourseSummary) -> Vec<CategoryBarVm> {
    summary
        .categories
        .iter()
        .map(|category| {
            let percent = category.percent.clamp(0.0, 100.0);
            CategoryBarVm {
                name: category.name.clone(),
                percent_label: format!("{}%", percent.round()),
                width_style: format!("width: {percent}%"),
            }
        })
        .collect()
}
