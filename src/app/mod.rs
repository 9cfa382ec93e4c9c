pub mod car_service;
