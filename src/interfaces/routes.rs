use actix_web::web;

use crate::handlers::{
    home::home, json_error::not_found, leads::create_lead, system::health_check,
};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(web::scope("/api").service(create_lead));

    cfg.default_service(web::route().to(not_found));
}
