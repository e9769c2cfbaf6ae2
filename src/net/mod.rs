pub mod http;
pub mod tcp;

pub use http::{HttpClient, HttpResponse, ReqwestHttp};
pub use tcp::{ConnectOutcome, TcpDialer, TokioDialer};
