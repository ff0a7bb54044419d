pub struct Args {
    pub geometry: Option<String>,
    pub shader: Option<String>,
}
