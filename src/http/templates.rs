use tera::Tera;

/// Templates are compiled into the binary so the server and the acceptance
/// tests need no filesystem layout at runtime.
pub fn build() -> tera::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        ("home.html", include_str!("../../templates/home.html")),
        ("todo_form.html", include_str!("../../templates/todo_form.html")),
    ])?;
    Ok(tera)
}
