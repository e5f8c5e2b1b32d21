pub fn render_schema() -> &'static str {
	include_str!("../sql/query_logs.sql")
}

pub fn statements() -> impl Iterator<Item = &'static str> {
	render_schema().split(';').map(str::trim).filter(|statement| !statement.is_empty())
}
