use crate::domain::UrlMeasurement;

pub trait Renderer: Send + Sync {
    fn render(&self, measurements: &[UrlMeasurement]) -> String;
}
