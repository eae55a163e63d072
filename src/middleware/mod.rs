pub mod jwt_middleware;
