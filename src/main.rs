use actix_web::{App, HttpServer, middleware, web};
use dotenvy::dotenv;

use catalog_service::auth::jwt::JwtService;
use catalog_service::config::ServerConfig;
use catalog_service::db::establish_connection_pool;
use catalog_service::repository::DieselRepository;
use catalog_service::routes::json_config;
use catalog_service::routes::products::{
    create_product, create_products_bulk, delete_product, list_products, search_products,
    show_product, show_product_by_sku, update_product,
};
use catalog_service::routes::tags::show_tags;
use catalog_service::routes::users::{login, register};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));
    dotenv().ok(); // Load .env file

    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let pool = match establish_connection_pool(&server_config.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to establish database connection: {e}");
            std::process::exit(1);
        }
    };
    let repo = DieselRepository::new(pool);
    let jwt = JwtService::new(&server_config.jwt);

    let address = server_config.address.clone();
    let port = server_config.port;

    log::info!("Listening on {address}:{port}");

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Compress::default())
            .wrap(middleware::Logger::default())
            .app_data(json_config())
            .app_data(web::Data::new(repo.clone()))
            .app_data(web::Data::new(jwt.clone()))
            .app_data(web::Data::new(server_config.clone()))
            .service(register)
            .service(login)
            .service(list_products)
            .service(search_products)
            .service(show_product_by_sku)
            .service(show_product)
            .service(create_products_bulk)
            .service(create_product)
            .service(update_product)
            .service(delete_product)
            .service(show_tags)
    })
    .bind((address, port))?
    .run()
    .await
}
