use kit::Application;
use todo_service::migrations::Migrator;
use todo_service::routes;

#[tokio::main]
async fn main() -> Result<(), kit::BoxError> {
    Application::new()
        .migrations::<Migrator>()
        .routes(routes::register)
        .run()
        .await
}
