//! 请求与响应的数据传输对象

pub mod request;
pub mod response;

pub use request::{
    CreateAccountRequest, CreateCompetitionRequest, FinishCompetitionRequest,
    JoinCompetitionRequest, PointsRequest,
};
pub use response::{AccountDto, ApiResponse, CompetitionDto, CreatedResponse};
